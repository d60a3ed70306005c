use std::{error::Error as StdError, fmt, result::Result as StdResult};

/// Geometry error type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A value was not finite.
    NotFinite(f64),
    /// A size component was negative.
    NegativeSize {
        /// Offending width.
        w: f64,
        /// Offending height.
        h: f64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite(v) => write!(f, "value is not finite: {v}"),
            Self::NegativeSize { w, h } => write!(f, "negative size: {w}x{h}"),
        }
    }
}

impl StdError for Error {}

/// Result type for geometry operations.
pub type Result<T> = StdResult<T, Error>;
