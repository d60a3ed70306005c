//! Node construction.
//!
//! Every node kind starts from a [`NodeConfig`] whose fields take their
//! values from the named constants below; builder methods override single
//! fields.

use trellis_geom::{Axis, Point, Size};

use crate::{
    core::{
        error::Result,
        handlers::{Handlers, KeyInput, MouseInput},
        layout::{OffAxis, OnAxis, StackLayout},
        node::NodeKind,
        style::{BORDER, FOREGROUND, FontHandle, Paint},
        ui::Context,
    },
    widgets::{ButtonState, LabelState},
};

/// Default border corner radius.
pub const DEFAULT_BORDER_RADIUS: f64 = 4.0;
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 11.0;
/// Horizontal padding of a button.
pub const BUTTON_PAD_X: f64 = 12.0;
/// Vertical padding of a button.
pub const BUTTON_PAD_Y: f64 = 8.0;
/// Border width of a button.
pub const BUTTON_BORDER: f64 = 2.0;
/// Font scale of a header label.
pub const HEADER_SCALE: f64 = 2.0;
/// Vertical margin of a header label.
pub const HEADER_MARGIN_Y: f64 = DEFAULT_FONT_SIZE;
/// Font scale of a subheader label.
pub const SUBHEADER_SCALE: f64 = 1.5;
/// Vertical margin of a subheader label.
pub const SUBHEADER_MARGIN_Y: f64 = DEFAULT_FONT_SIZE * 0.75;
/// Font scale of a section label.
pub const SECTION_SCALE: f64 = 1.25;
/// Vertical margin of a section label.
pub const SECTION_MARGIN_Y: f64 = DEFAULT_FONT_SIZE;

/// Sizing policy and style shared by every node kind.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Sizing along the parent's major axis.
    pub on_axis: OnAxis,
    /// Alignment along the parent's minor axis.
    pub off_axis: OffAxis,
    /// Horizontal padding, inside the padded size.
    pub pad_x: f64,
    /// Vertical padding, inside the padded size.
    pub pad_y: f64,
    /// Horizontal margin, outside the padded size.
    pub margin_x: f64,
    /// Vertical margin, outside the padded size.
    pub margin_y: f64,
    /// Border width, outside the padded size.
    pub border: f64,
    /// Border stroke paint.
    pub border_color: Paint,
    /// Border corner radius.
    pub border_radius: f64,
    /// Background paint; `None` leaves the parent's pixels.
    pub bg: Option<Paint>,
    /// Foreground paint for text.
    pub fg: Paint,
    /// Font; `None` uses the UI base font.
    pub font: Option<FontHandle>,
    /// Font size in points.
    pub font_size: f64,
    /// May take keyboard focus and be dragged.
    pub can_focus: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            on_axis: OnAxis::Normal,
            off_axis: OffAxis::Start,
            pad_x: 0.0,
            pad_y: 0.0,
            margin_x: 0.0,
            margin_y: 0.0,
            border: 0.0,
            border_color: BORDER,
            border_radius: DEFAULT_BORDER_RADIUS,
            bg: None,
            fg: FOREGROUND,
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            can_focus: false,
        }
    }
}

/// A description of a subtree, turned into arena nodes by
/// [`crate::Tree::insert`].
#[derive(Debug)]
pub struct NodeBuilder {
    /// Kind and kind state.
    pub(crate) kind: NodeKind,
    /// Sizing policy and style.
    pub(crate) config: NodeConfig,
    /// Initial position.
    pub(crate) pos: Point,
    /// Initial content size.
    pub(crate) content: Size,
    /// Initial pinned state.
    pub(crate) pinned: bool,
    /// Handler slots.
    pub(crate) handlers: Handlers,
    /// Child descriptions.
    pub(crate) children: Vec<Self>,
}

/// Generate builder methods that install a handler.
macro_rules! hooks {
    ($($(#[$doc:meta])* $method:ident => $setter:ident: $args:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $method<F>(mut self, f: F) -> Self
            where
                F: FnMut(&mut Context<'_>, &$args) -> Result<()> + 'static,
            {
                self.handlers.$setter(f);
                self
            }
        )*
    };
}

impl NodeBuilder {
    /// A builder for `kind` with default configuration.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            config: NodeConfig::default(),
            pos: Point::zero(),
            content: Size::default(),
            pinned: false,
            handlers: Handlers::default(),
            children: Vec::new(),
        }
    }

    /// A plain box.
    pub fn boxed() -> Self {
        Self::new(NodeKind::Box)
    }

    /// A box with a fixed content size.
    pub fn space(cx: f64, cy: f64) -> Self {
        Self::boxed().content(cx, cy)
    }

    /// A box that can take focus.
    pub fn control() -> Self {
        Self::boxed().can_focus(true)
    }

    /// A stack arranging children along `direction`.
    pub fn stack(direction: Axis) -> Self {
        Self::new(NodeKind::Stack(StackLayout {
            direction,
            justify: false,
        }))
    }

    /// A vertical stack.
    pub fn vstack() -> Self {
        Self::stack(Axis::Vertical)
    }

    /// A horizontal stack.
    pub fn hstack() -> Self {
        Self::stack(Axis::Horizontal)
    }

    /// A label.
    pub fn label(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Label(LabelState::new(text)))
    }

    /// A header label.
    pub fn header(text: impl Into<String>) -> Self {
        Self::label(text)
            .font_size(DEFAULT_FONT_SIZE * HEADER_SCALE)
            .margin(0.0, HEADER_MARGIN_Y)
    }

    /// A subheader label.
    pub fn subheader(text: impl Into<String>) -> Self {
        Self::label(text)
            .font_size(DEFAULT_FONT_SIZE * SUBHEADER_SCALE)
            .margin(0.0, SUBHEADER_MARGIN_Y)
    }

    /// A section label.
    pub fn section(text: impl Into<String>) -> Self {
        Self::label(text)
            .font_size(DEFAULT_FONT_SIZE * SECTION_SCALE)
            .margin(0.0, SECTION_MARGIN_Y)
    }

    /// A button. An empty `text` leaves room for children instead.
    pub fn button(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Button(ButtonState::new(text)))
            .can_focus(true)
            .pad(BUTTON_PAD_X, BUTTON_PAD_Y)
            .border(BUTTON_BORDER)
    }

    /// A focusable node that draws its padded and content rectangles.
    pub fn debug() -> Self {
        Self::new(NodeKind::Debug).can_focus(true)
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial position relative to the parent.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.pos = Point::new(x, y);
        self
    }

    /// Content size. Only boxes keep this across measurement.
    pub fn content(mut self, cx: f64, cy: f64) -> Self {
        self.content = Size::new(cx, cy);
        self
    }

    /// Padding.
    pub fn pad(mut self, x: f64, y: f64) -> Self {
        self.config.pad_x = x;
        self.config.pad_y = y;
        self
    }

    /// Margin.
    pub fn margin(mut self, x: f64, y: f64) -> Self {
        self.config.margin_x = x;
        self.config.margin_y = y;
        self
    }

    /// Border width.
    pub fn border(mut self, width: f64) -> Self {
        self.config.border = width;
        self
    }

    /// Border paint.
    pub fn border_color(mut self, paint: Paint) -> Self {
        self.config.border_color = paint;
        self
    }

    /// Border corner radius.
    pub fn border_radius(mut self, radius: f64) -> Self {
        self.config.border_radius = radius;
        self
    }

    /// Major-axis sizing.
    pub fn on_axis(mut self, on: OnAxis) -> Self {
        self.config.on_axis = on;
        self
    }

    /// Minor-axis alignment.
    pub fn off_axis(mut self, off: OffAxis) -> Self {
        self.config.off_axis = off;
        self
    }

    /// Fill along both axes.
    pub fn fill(self) -> Self {
        self.on_axis(OnAxis::Fill).off_axis(OffAxis::Fill)
    }

    /// Initial pinned state.
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Background paint.
    pub fn bg(mut self, paint: Paint) -> Self {
        self.config.bg = Some(paint);
        self
    }

    /// Foreground paint.
    pub fn fg(mut self, paint: Paint) -> Self {
        self.config.fg = paint;
        self
    }

    /// Font, overriding the UI base font.
    pub fn font(mut self, font: FontHandle) -> Self {
        self.config.font = Some(font);
        self
    }

    /// Font size in points.
    pub fn font_size(mut self, size: f64) -> Self {
        self.config.font_size = size;
        self
    }

    /// Focusability.
    pub fn can_focus(mut self, can_focus: bool) -> Self {
        self.config.can_focus = can_focus;
        self
    }

    /// Spread leftover space between children. Only meaningful for stacks.
    pub fn justify(mut self, justify: bool) -> Self {
        if let NodeKind::Stack(stack) = &mut self.kind {
            stack.justify = justify;
        }
        self
    }

    /// Enable or disable a button.
    pub fn enabled(mut self, enabled: bool) -> Self {
        if let NodeKind::Button(button) = &mut self.kind {
            button.enabled = enabled;
        }
        self
    }

    /// Append a child.
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append children.
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    hooks! {
        /// Handle clicks.
        on_click => set_click: MouseInput;
        /// Handle mouse-down.
        on_mouse_down => set_mouse_down: MouseInput;
        /// Handle mouse-up.
        on_mouse_up => set_mouse_up: MouseInput;
        /// Handle pointer movement.
        on_mouse_move => set_mouse_move: MouseInput;
        /// Handle key-down.
        on_key_down => set_key_down: KeyInput;
        /// Handle key-up.
        on_key_up => set_key_up: KeyInput;
        /// Handle typed characters.
        on_char => set_char: char;
        /// Handle hover gain.
        on_hover => set_hover: Point;
        /// Handle hover loss.
        on_hover_lost => set_hover_lost: ();
        /// Handle focus gain.
        on_focus => set_focus: ();
        /// Handle focus loss.
        on_focus_lost => set_focus_lost: ();
        /// Handle drag start.
        on_drag_start => set_drag_start: MouseInput;
        /// Handle drag movement.
        on_drag_move => set_drag_move: MouseInput;
        /// Handle drag end.
        on_drag_end => set_drag_end: MouseInput;
        /// Handle dirtiness passing through.
        on_dirty => set_dirty: ();
    }
}
