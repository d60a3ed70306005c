//! Per-node event handler slots.
//!
//! Each slot holds at most one handler. An empty slot is the no-op default
//! and is what key delegation checks before bubbling to the parent.

use std::{cell::RefCell, fmt, rc::Rc};

use trellis_geom::Point;

use crate::core::{
    error::Result,
    event::{Button, Key, Mods},
    ui::Context,
};

/// A shared, mutable event handler.
pub type Handler<A> = Rc<RefCell<dyn FnMut(&mut Context<'_>, &A) -> Result<()>>>;

/// A handler slot; `None` is the no-op default.
pub type Slot<A> = Option<Handler<A>>;

/// Arguments for pointer hooks. Positions are local to the receiving node,
/// except for drag hooks, which receive positions in the parent's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseInput {
    /// Pointer position.
    pub pos: Point,
    /// Button involved.
    pub button: Button,
    /// Active modifiers.
    pub mods: Mods,
}

impl MouseInput {
    /// Construct a mouse input.
    pub fn new(x: f64, y: f64, button: Button, mods: Mods) -> Self {
        Self {
            pos: Point::new(x, y),
            button,
            mods,
        }
    }
}

/// Arguments for key hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    /// Key.
    pub key: Key,
    /// Active modifiers.
    pub mods: Mods,
}

/// Wrap a closure as a [`Handler`].
pub fn handler<A, F>(f: F) -> Handler<A>
where
    A: 'static,
    F: FnMut(&mut Context<'_>, &A) -> Result<()> + 'static,
{
    Rc::new(RefCell::new(f))
}

/// Define the handler slot table and its setters.
macro_rules! slots {
    ($($(#[$doc:meta])* $name:ident, $setter:ident: $args:ty;)*) => {
        /// The handler slots of one node.
        #[derive(Default, Clone)]
        pub struct Handlers {
            $(
                $(#[$doc])*
                pub(crate) $name: Slot<$args>,
            )*
        }

        impl Handlers {
            $(
                $(#[$doc])*
                pub fn $setter<F>(&mut self, f: F) -> &mut Self
                where
                    F: FnMut(&mut Context<'_>, &$args) -> Result<()> + 'static,
                {
                    self.$name = Some(handler(f));
                    self
                }
            )*

            /// Names of the slots that hold a handler.
            pub fn installed(&self) -> Vec<&'static str> {
                let mut out = Vec::new();
                $(
                    if self.$name.is_some() {
                        out.push(stringify!($name));
                    }
                )*
                out
            }
        }
    };
}

slots! {
    /// Fired on mouse-up over a node that may be clicked.
    click, set_click: MouseInput;
    /// Fired on mouse-down over the node.
    mouse_down, set_mouse_down: MouseInput;
    /// Fired on mouse-up over the node.
    mouse_up, set_mouse_up: MouseInput;
    /// Fired when the pointer moves over the node.
    mouse_move, set_mouse_move: MouseInput;
    /// Fired on key-down while focused.
    key_down, set_key_down: KeyInput;
    /// Fired on key-up while focused.
    key_up, set_key_up: KeyInput;
    /// Fired for typed characters while focused.
    char, set_char: char;
    /// Fired when the node becomes hovered, with the local pointer position.
    hover, set_hover: Point;
    /// Fired when the node stops being hovered.
    hover_lost, set_hover_lost: ();
    /// Fired when the node gains focus.
    focus, set_focus: ();
    /// Fired when the node loses focus.
    focus_lost, set_focus_lost: ();
    /// Fired when a drag of this node starts.
    drag_start, set_drag_start: MouseInput;
    /// Fired as a dragged node moves.
    drag_move, set_drag_move: MouseInput;
    /// Fired once when a drag of this node ends.
    drag_end, set_drag_end: MouseInput;
    /// Fired as dirtiness propagates through the node.
    dirty, set_dirty: ();
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.installed()).finish()
    }
}
