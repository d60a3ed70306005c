use std::{cell::RefCell, rc::Rc};

use trellis::{
    NodeBuilder, NodeId, Ui,
    error::Result,
    event::{Button, Key, Mods, PlatformEvent},
    handlers::KeyInput,
    geom::{Point, Size},
    layout::{OffAxis, OnAxis},
    style::Paint,
};

/// Sidebar background.
pub const BLUE: Paint = Paint::lch(0.35, 0.6, 0.8);
/// Sidebar text.
pub const WHITE: Paint = Paint::lch(1.0, 0.0, 0.0);
/// Canvas background.
pub const GREY: Paint = Paint::lch(0.7, 0.0, 0.0);
/// Side length of a tack.
pub const TACK_SIZE: f64 = 8.0;

/// State shared between the canvas and the sidebar.
#[derive(Debug, Default)]
pub struct Tacks {
    /// The canvas node, known once it has handled a click.
    pub canvas: Option<NodeId>,
    /// A click has started a run of tacks that Esc ends.
    pub adding: bool,
    /// Tacks placed since the last clear.
    pub placed: usize,
}

/// Handle on the demo state.
pub type Shared = Rc<RefCell<Tacks>>;

/// A small draggable marker, pinned at `at` in its parent's frame.
pub fn tack(at: Point) -> NodeBuilder {
    NodeBuilder::control()
        .content(TACK_SIZE, TACK_SIZE)
        .bg(BLUE)
        .at(at.x, at.y)
        .pinned(true)
        .on_mouse_down(|c, m| {
            c.begin_drag(m)?;
            Ok(())
        })
}

/// Ctrl+W ends the session.
pub fn is_quit(k: &KeyInput) -> bool {
    matches!(k.key, Key::Char('w' | 'W')) && k.mods == Mods::Ctrl
}

/// The canvas: a click drops a tack where it lands.
pub fn canvas(state: &Shared) -> NodeBuilder {
    let on_click = Rc::clone(state);
    let on_key = Rc::clone(state);
    NodeBuilder::control()
        .fill()
        .bg(GREY)
        .on_click(move |c, m| {
            let id = c.node_id();
            let t = c.ui().add_new(id, tack(m.pos))?;
            tracing::debug!(?t, at = ?m.pos, "tack placed");
            {
                let mut s = on_click.borrow_mut();
                s.canvas = Some(id);
                s.adding = true;
                s.placed += 1;
            }
            c.dirty()
        })
        .on_key_down(move |c, k| {
            if is_quit(k) {
                c.request_exit();
            } else if k.key == Key::Esc && k.mods.is_empty() {
                on_key.borrow_mut().adding = false;
                c.dirty()?;
            }
            Ok(())
        })
}

/// The sidebar: text presets and a button that clears the canvas. Ctrl+W
/// reaches it from the focused button.
pub fn sidebar(state: &Shared) -> NodeBuilder {
    let on_clear = Rc::clone(state);
    NodeBuilder::vstack()
        .on_axis(OnAxis::Percent(25.0))
        .off_axis(OffAxis::Fill)
        .bg(BLUE)
        .fg(WHITE)
        .pad(8.0, 8.0)
        .on_key_down(|c, k| {
            if is_quit(k) {
                c.request_exit();
            }
            Ok(())
        })
        .children([
            NodeBuilder::header("Header").fg(WHITE),
            NodeBuilder::subheader("Subheader").fg(WHITE),
            NodeBuilder::section("Section").fg(WHITE),
            NodeBuilder::label("Just regular text").fg(WHITE),
            NodeBuilder::button("Clear").on_click(move |c, _| {
                let Some(canvas) = on_clear.borrow().canvas else {
                    return Ok(());
                };
                let tacks = c.ui().tree().children(canvas).to_vec();
                tracing::debug!(count = tacks.len(), "clearing tacks");
                for t in tacks {
                    c.ui().remove(t)?;
                }
                let mut s = on_clear.borrow_mut();
                s.adding = false;
                s.placed = 0;
                Ok(())
            }),
        ])
}

/// The whole demo: sidebar on the left, canvas filling the rest.
pub fn demo(state: &Shared) -> NodeBuilder {
    NodeBuilder::hstack()
        .fill()
        .child(sidebar(state))
        .child(canvas(state))
}

/// A short scripted session for a window of `size`: three clicks on the
/// canvas, a drag of the first tack, Esc, and Ctrl+W.
pub fn sample_script(size: Size) -> Vec<PlatformEvent> {
    let left = size.w * 0.25;
    let click = |x: f64, y: f64| {
        [
            PlatformEvent::MouseMove {
                x,
                y,
                button: Button::None,
                mods: Mods::Empty,
            },
            PlatformEvent::MouseDown {
                x,
                y,
                button: Button::Left,
                mods: Mods::Empty,
            },
            PlatformEvent::MouseUp {
                x,
                y,
                button: Button::Left,
                mods: Mods::Empty,
            },
        ]
    };
    let mut events = vec![PlatformEvent::Resize {
        width: size.w,
        height: size.h,
    }];
    events.extend(click(left + 40.0, 40.0));
    events.extend(click(left + 120.0, 60.0));
    events.extend(click(left + 80.0, 140.0));
    events.extend([
        PlatformEvent::MouseDown {
            x: left + 42.0,
            y: 42.0,
            button: Button::Left,
            mods: Mods::Empty,
        },
        PlatformEvent::MouseMove {
            x: left + 62.0,
            y: 92.0,
            button: Button::Left,
            mods: Mods::Empty,
        },
        PlatformEvent::MouseUp {
            x: left + 62.0,
            y: 92.0,
            button: Button::Left,
            mods: Mods::Empty,
        },
        PlatformEvent::KeyDown {
            key: Key::Esc,
            mods: Mods::Empty,
        },
        PlatformEvent::KeyDown {
            key: Key::Char('w'),
            mods: Mods::Ctrl,
        },
        PlatformEvent::Close,
    ]);
    events
}

/// Count the tacks currently on the canvas.
pub fn tack_count(ui: &Ui, state: &Shared) -> Result<usize> {
    let Some(canvas) = state.borrow().canvas else {
        return Ok(0);
    };
    Ok(ui.tree().get(canvas)?.children().len())
}
