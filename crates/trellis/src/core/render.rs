use scopeguard::guard;
use trellis_geom::{Point, Rect};

use crate::{
    core::{
        backend::Metrics,
        error::Result,
        id::NodeId,
        node::NodeKind,
        style::{FontHandle, Paint},
        tree::Tree,
    },
    widgets::{button, debug, label},
};

/// A drawing target. Coordinates are relative to the surface origin; a
/// sub-surface has its own origin and clip.
pub trait Surface {
    /// Fill the whole surface.
    fn clear(&mut self, paint: &Paint) -> Result<()>;

    /// Set the current path to a rounded rectangle.
    fn rounded_rect_path(&mut self, rect: Rect, rx: f64, ry: f64) -> Result<()>;

    /// Fill the current path.
    fn fill_path(&mut self, paint: &Paint) -> Result<()>;

    /// Stroke the current path.
    fn stroke_path(&mut self, paint: &Paint, width: f64) -> Result<()>;

    /// Draw a line of text with its top-left corner at `at`.
    fn print_text(&mut self, font: &FontHandle, at: Point, text: &str, paint: &Paint) -> Result<()>;

    /// A child surface with its origin at `rect.tl`, clipped to `rect`.
    fn sub_surface(&mut self, rect: Rect) -> Result<Box<dyn Surface + '_>>;

    /// Release resources held by a sub-surface.
    fn release(&mut self) {}

    /// Push the finished frame to the display.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Paints a subtree.
pub struct RenderPass<'a> {
    /// The tree being drawn. Drawing clears dirty flags.
    tree: &'a mut Tree,
    /// Font resolution for text.
    metrics: Metrics<'a>,
}

impl<'a> RenderPass<'a> {
    /// Start a pass.
    pub fn new(tree: &'a mut Tree, metrics: Metrics<'a>) -> Self {
        Self { tree, metrics }
    }

    /// Draw `id` onto `surface`, whose origin is the node's padded origin.
    pub fn draw(&mut self, id: NodeId, surface: &mut dyn Surface) -> Result<()> {
        let node = self.tree.get_mut(id)?;
        node.is_dirty = false;
        let node = &*node;
        if let Some(bg) = &node.config.bg {
            surface.clear(bg)?;
        }
        match &node.kind {
            NodeKind::Label(state) => {
                let font = self.metrics.font_for(&node.config);
                label::draw(node, state, &font, surface)?;
            }
            NodeKind::Button(state) => {
                let font = self.metrics.font_for(&node.config);
                button::draw(node, state, &font, surface)?;
            }
            NodeKind::Debug => debug::draw(node, surface)?,
            NodeKind::Box | NodeKind::Stack(_) => {}
        }

        let children = node.children.clone();
        for pinned in [false, true] {
            for c in &children {
                if self.tree.get(*c)?.pinned == pinned {
                    self.draw_child(*c, surface)?;
                }
            }
        }
        Ok(())
    }

    /// Stroke a child's border and draw it into its own sub-surface.
    fn draw_child(&mut self, id: NodeId, surface: &mut dyn Surface) -> Result<()> {
        let node = self.tree.get(id)?;
        let b = node.config.border;
        let outer = Rect::new(node.pos.x, node.pos.y, node.size.w + 2.0 * b, node.size.h + 2.0 * b);
        if b > 0.0 {
            let r = node.config.border_radius;
            surface.rounded_rect_path(outer.inset(b / 2.0), r, r)?;
            surface.stroke_path(&node.config.border_color, b)?;
        }
        let sub = surface.sub_surface(outer.inset(b))?;
        let mut sub = guard(sub, |mut s| s.release());
        self.draw(id, &mut **sub)
    }
}
