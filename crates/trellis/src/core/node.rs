use std::fmt;

use trellis_geom::{Axis, Point, Rect, Size};

use crate::{
    core::{builder::NodeConfig, handlers::Handlers, id::NodeId, layout::StackLayout},
    widgets::{ButtonState, LabelState},
};

/// The closed set of node kinds. Each kind has its own measurement and
/// drawing; packing differs only for stacks.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A plain box with a configured content size.
    Box,
    /// A box that arranges its children along an axis.
    Stack(StackLayout),
    /// A line of text.
    Label(LabelState),
    /// A pressable control.
    Button(ButtonState),
    /// Draws its padded and content rectangles.
    Debug,
}

impl NodeKind {
    /// Short lowercase name, used in dumps and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Stack(s) if s.direction == Axis::Horizontal => "hstack",
            Self::Stack(_) => "vstack",
            Self::Label(_) => "label",
            Self::Button(_) => "button",
            Self::Debug => "debug",
        }
    }
}

/// A node in the arena.
pub struct Node {
    /// Kind-specific state.
    pub(crate) kind: NodeKind,
    /// Sizing policy and style.
    pub(crate) config: NodeConfig,
    /// Event handler slots.
    pub(crate) handlers: Handlers,
    /// Parent back-reference.
    pub(crate) parent: Option<NodeId>,
    /// Owned children in paint and hit-test order.
    pub(crate) children: Vec<NodeId>,
    /// Position relative to the parent's padded origin.
    pub(crate) pos: Point,
    /// Measured content size.
    pub(crate) content: Size,
    /// Padded size assigned by packing.
    pub(crate) size: Size,
    /// Excluded from layout and painted last.
    pub(crate) pinned: bool,
    /// Under the pointer.
    pub(crate) hovered: bool,
    /// Holds keyboard focus.
    pub(crate) focused: bool,
    /// Needs repaint.
    pub(crate) is_dirty: bool,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind.name())
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("content", &self.content)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

impl Node {
    /// Kind-specific state.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Mutable kind-specific state. Callers should dirty the node afterwards.
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Sizing policy and style.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Mutable sizing policy and style.
    pub fn config_mut(&mut self) -> &mut NodeConfig {
        &mut self.config
    }

    /// Event handler slots.
    pub fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }

    /// The parent, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position relative to the parent.
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Move the node. Packing overwrites this unless the node is pinned.
    pub fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
    }

    /// Measured content size.
    pub fn content(&self) -> Size {
        self.content
    }

    /// Set the content size. Only boxes keep this across a measure pass.
    pub fn set_content(&mut self, content: Size) {
        self.content = content;
    }

    /// Padded size assigned by packing.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The padded rectangle in the parent's frame.
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.w, self.size.h)
    }

    /// Is this node pinned?
    pub fn pinned(&self) -> bool {
        self.pinned
    }

    /// Is this node hovered?
    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Does this node hold focus?
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Has this node been dirtied since it was last drawn?
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Can this node take focus?
    pub fn can_focus(&self) -> bool {
        self.config.can_focus
    }

    /// Padding on one side along `axis`.
    pub fn pad(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.config.pad_x,
            Axis::Vertical => self.config.pad_y,
        }
    }

    /// Margin on one side along `axis`.
    pub fn margin(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.config.margin_x,
            Axis::Vertical => self.config.margin_y,
        }
    }

    /// Space outside the padded size along `axis`: border and margin on both sides.
    pub fn extra(&self, axis: Axis) -> f64 {
        2.0 * (self.config.border + self.margin(axis))
    }

    /// Content plus padding along `axis`.
    pub fn inner(&self, axis: Axis) -> f64 {
        self.content.on(axis) + 2.0 * self.pad(axis)
    }

    /// Total footprint along `axis` as seen by a parent stack.
    pub fn outer(&self, axis: Axis) -> f64 {
        self.inner(axis) + self.extra(axis)
    }
}
