//! Node kinds with their own measurement, drawing, and built-in reactions.

/// Buttons.
pub mod button;
/// Debug rectangles.
pub mod debug;
/// Text labels.
pub mod label;

pub use button::ButtonState;
pub use label::LabelState;
