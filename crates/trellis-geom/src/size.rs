use serde::{Deserialize, Serialize};

use crate::{Axis, Error, Result};

/// A width and height with no location.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Size {
    /// Construct a size without validation.
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Construct a size, rejecting negative or non-finite components.
    pub fn checked(w: f64, h: f64) -> Result<Self> {
        for v in [w, h] {
            if !v.is_finite() {
                return Err(Error::NotFinite(v));
            }
        }
        if w < 0.0 || h < 0.0 {
            return Err(Error::NegativeSize { w, h });
        }
        Ok(Self { w, h })
    }

    /// The extent along an axis.
    pub fn on(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    /// Replace the extent along an axis.
    pub fn set_on(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.w = value,
            Axis::Vertical => self.h = value,
        }
    }
}
