use trellis_geom::Rect;

use crate::core::{error::Result, node::Node, render::Surface, style::Paint};

/// Fill for the padded box.
const PADDED: Paint = Paint::rgb(0.5, 0.5, 0.5);
/// Fill for the content box.
const CONTENT: Paint = Paint::rgb(0.0, 0.0, 0.0);

/// Fill the padded box, then the content box inside the padding.
pub(crate) fn draw(node: &Node, surface: &mut dyn Surface) -> Result<()> {
    let size = node.size();
    surface.rounded_rect_path(Rect::new(0.0, 0.0, size.w, size.h), 0.0, 0.0)?;
    surface.fill_path(&PADDED)?;
    let (pad, content) = (node.config(), node.content());
    surface.rounded_rect_path(Rect::new(pad.pad_x, pad.pad_y, content.w, content.h), 0.0, 0.0)?;
    surface.fill_path(&CONTENT)
}
