use trellis_geom::Point;

use crate::{
    core::{error::Result, handlers::MouseInput, id::NodeId, ui::Ui},
    widgets::button,
};

/// An active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// The node being dragged.
    pub node: NodeId,
    /// Pointer position relative to the node's origin when the drag began.
    pub anchor: Point,
}

/// Hover, focus, and drag state for one UI. Each is held by at most one
/// node at a time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Interaction {
    /// The node under the pointer.
    pub(crate) hovered: Option<NodeId>,
    /// The node with keyboard focus.
    pub(crate) focused: Option<NodeId>,
    /// The active drag.
    pub(crate) drag: Option<Drag>,
}

impl Interaction {
    /// The hovered node.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// The focused node.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// The active drag, if any.
    pub fn drag(&self) -> Option<Drag> {
        self.drag
    }
}

/// Transitions of the interaction state. Each transition updates the state
/// and node flags first, then fires hooks, so a hook that starts another
/// transition sees a consistent state.
pub trait InteractionManager {
    /// Move hover to `node`, which sees the pointer at `at` in its own
    /// frame. Returns `true` if hover changed.
    fn set_hover(&mut self, node: Option<NodeId>, at: Point) -> Result<bool>;

    /// Move focus to `node`. Nodes that cannot focus are ignored. Returns
    /// `true` if focus changed.
    fn set_focus(&mut self, node: Option<NodeId>) -> Result<bool>;

    /// Start dragging `node`, anchored at `m.pos` in its own frame. Ignored
    /// while another drag is active or if the node cannot focus. Returns
    /// `true` if the drag started.
    fn begin_drag(&mut self, node: NodeId, m: &MouseInput) -> Result<bool>;

    /// Move the dragged node so the anchor sits at `m.pos`, given in the
    /// node's parent frame.
    fn drag_move(&mut self, m: &MouseInput) -> Result<()>;

    /// Finish the active drag. The node stays pinned. Returns `true` if a
    /// drag was active.
    fn end_drag(&mut self, m: &MouseInput) -> Result<bool>;

    /// Release hover and focus held by any of `nodes`, and drop a drag held
    /// by one of them.
    fn clear_status(&mut self, nodes: &[NodeId]) -> Result<()>;
}

impl InteractionManager for Ui {
    fn set_hover(&mut self, node: Option<NodeId>, at: Point) -> Result<bool> {
        let node = node.filter(|id| self.tree.node(*id).is_some());
        if self.interaction.hovered == node {
            return Ok(false);
        }
        let old = self.interaction.hovered;
        self.interaction.hovered = node;
        if let Some(n) = old.and_then(|id| self.tree.node_mut(id)) {
            n.hovered = false;
        }
        if let Some(n) = node.and_then(|id| self.tree.node_mut(id)) {
            n.hovered = true;
        }
        tracing::debug!(?old, ?node, "hover");

        if let Some(old) = old {
            button::release(self, old)?;
            self.fire(old, |h| &h.hover_lost, &())?;
        }
        if let Some(new) = node {
            self.fire(new, |h| &h.hover, &at)?;
        }
        let root = self.root();
        self.dirty(root)?;
        Ok(true)
    }

    fn set_focus(&mut self, node: Option<NodeId>) -> Result<bool> {
        if let Some(id) = node
            && !self.tree.node(id).is_some_and(|n| n.config.can_focus)
        {
            return Ok(false);
        }
        if self.interaction.focused == node {
            return Ok(false);
        }
        let old = self.interaction.focused;
        self.interaction.focused = node;
        if let Some(n) = old.and_then(|id| self.tree.node_mut(id)) {
            n.focused = false;
        }
        if let Some(n) = node.and_then(|id| self.tree.node_mut(id)) {
            n.focused = true;
        }
        tracing::debug!(?old, ?node, "focus");

        if let Some(old) = old.filter(|id| self.tree.node(*id).is_some()) {
            self.fire(old, |h| &h.focus_lost, &())?;
            self.dirty(old)?;
        }
        if let Some(new) = node {
            self.fire(new, |h| &h.focus, &())?;
            self.dirty(new)?;
        }
        Ok(true)
    }

    fn begin_drag(&mut self, node: NodeId, m: &MouseInput) -> Result<bool> {
        if let Some(active) = self.interaction.drag {
            tracing::debug!(?node, active = ?active.node, "drag already active");
            return Ok(false);
        }
        let Some(n) = self.tree.node_mut(node) else {
            return Ok(false);
        };
        if !n.config.can_focus {
            tracing::debug!(?node, "cannot drag a node that cannot focus");
            return Ok(false);
        }
        n.pinned = true;
        self.interaction.drag = Some(Drag {
            node,
            anchor: m.pos,
        });
        tracing::debug!(?node, anchor = ?m.pos, "drag start");
        self.fire(node, |h| &h.drag_start, m)?;
        Ok(true)
    }

    fn drag_move(&mut self, m: &MouseInput) -> Result<()> {
        let Some(drag) = self.interaction.drag else {
            return Ok(());
        };
        let Some(n) = self.tree.node_mut(drag.node) else {
            self.interaction.drag = None;
            return Ok(());
        };
        n.pos = m.pos - drag.anchor;
        self.dirty(drag.node)?;
        self.fire(drag.node, |h| &h.drag_move, m)?;
        Ok(())
    }

    fn end_drag(&mut self, m: &MouseInput) -> Result<bool> {
        let Some(drag) = self.interaction.drag else {
            return Ok(false);
        };
        tracing::debug!(node = ?drag.node, "drag end");
        let fired = self.fire(drag.node, |h| &h.drag_end, m);
        self.interaction.drag = None;
        fired?;
        Ok(true)
    }

    fn clear_status(&mut self, nodes: &[NodeId]) -> Result<()> {
        if self.interaction.hovered.is_some_and(|id| nodes.contains(&id)) {
            self.set_hover(None, Point::zero())?;
        }
        if self.interaction.focused.is_some_and(|id| nodes.contains(&id)) {
            self.set_focus(None)?;
        }
        if let Some(drag) = self.interaction.drag
            && nodes.contains(&drag.node)
        {
            tracing::debug!(node = ?drag.node, "drag dropped with its node");
            self.interaction.drag = None;
        }
        Ok(())
    }
}
