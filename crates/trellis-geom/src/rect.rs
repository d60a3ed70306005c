use serde::{Deserialize, Serialize};

use crate::Point;

/// An axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// True if the point lies within the rectangle. Edges are inclusive on
    /// both sides, so a point on the far edge is still contained.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x
            && p.x <= self.tl.x + self.w
            && p.y >= self.tl.y
            && p.y <= self.tl.y + self.h
    }

    /// Shift the rectangle by an offset.
    pub fn shift(&self, by: Point) -> Self {
        Self {
            tl: self.tl + by,
            w: self.w,
            h: self.h,
        }
    }

    /// Shrink the rectangle by `d` on every side. Dimensions clamp at zero.
    pub fn inset(&self, d: f64) -> Self {
        Self::new(
            self.tl.x + d,
            self.tl.y + d,
            (self.w - d * 2.0).max(0.0),
            (self.h - d * 2.0).max(0.0),
        )
    }
}
