use trellis_geom::{Point, Size};

use crate::core::{
    backend::Metrics, error::Result, node::Node, render::Surface, style::FontHandle,
};

/// Text shown when a label is constructed with an empty string.
pub const PLACEHOLDER: &str = "(sample text)";

/// A single line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelState {
    /// The text.
    pub text: String,
}

impl LabelState {
    /// Label state for `text`, substituting a placeholder when empty.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            text: if text.is_empty() {
                PLACEHOLDER.into()
            } else {
                text
            },
        }
    }
}

/// Content size of the text.
pub(crate) fn measure(state: &LabelState, font: &FontHandle, metrics: &Metrics<'_>) -> Size {
    metrics.text_size(font, &state.text)
}

/// Top-left corner that centers `content` inside `size`.
pub(crate) fn centered(size: Size, content: Size) -> Point {
    Point::new((size.w - content.w) * 0.5, (size.h - content.h) * 0.5)
}

/// Print the text centered in the padded box.
pub(crate) fn draw(
    node: &Node,
    state: &LabelState,
    font: &FontHandle,
    surface: &mut dyn Surface,
) -> Result<()> {
    surface.print_text(
        font,
        centered(node.size(), node.content()),
        &state.text,
        &node.config().fg,
    )
}
