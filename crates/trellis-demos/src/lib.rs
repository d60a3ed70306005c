//! Example node trees used by trellis demos.

/// Tack canvas demo.
pub mod tackgrid;
