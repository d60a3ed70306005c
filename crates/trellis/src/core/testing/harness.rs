use std::{cell::RefCell, rc::Rc};

use trellis_geom::{Point, Size};

use super::backend::{FixedFonts, RecordingSurface};
use crate::core::{
    builder::NodeBuilder,
    error::Result,
    event::{Button, Key, Mods, PlatformEvent},
    id::NodeId,
    node::NodeKind,
    ui::{Context, Ui, UiConfig},
};

/// A shared log of hook invocations, in call order.
#[derive(Debug, Clone, Default)]
pub struct HookLog(Rc<RefCell<Vec<String>>>);

impl HookLog {
    /// A handler that appends `label` to the log each time it runs.
    pub fn hook<A: 'static>(
        &self,
        label: &str,
    ) -> impl FnMut(&mut Context<'_>, &A) -> Result<()> + 'static + use<A> {
        let log = Rc::clone(&self.0);
        let label = label.to_string();
        move |_: &mut Context<'_>, _: &A| {
            log.borrow_mut().push(label.clone());
            Ok(())
        }
    }

    /// Logged labels.
    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// How many times `label` was logged.
    pub fn count(&self, label: &str) -> usize {
        self.0.borrow().iter().filter(|l| *l == label).count()
    }

    /// Forget logged labels.
    pub fn reset(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Holds a [`Ui`] over fixed-metric fonts and a recording surface. Tests
/// drive it with events; each event that schedules a repaint is followed by
/// a layout and draw, as the run loop would do.
pub struct Harness {
    /// The UI under test.
    pub ui: Ui,
    /// The surface frames are drawn to.
    pub surface: RecordingSurface,
    /// Frames drawn so far.
    pub frames: usize,
}

/// Builder for a [`Harness`].
pub struct HarnessBuilder {
    /// Root description.
    root: NodeBuilder,
    /// UI settings.
    config: UiConfig,
}

impl HarnessBuilder {
    /// Set the window size.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Set the DPI.
    pub fn dpi(mut self, dpi: f64) -> Self {
        self.config.dpi = dpi;
        self
    }

    /// Build the harness and draw the first frame.
    pub fn build(self) -> Result<Harness> {
        let size = Size::new(self.config.width, self.config.height);
        let ui = Ui::new(self.root, FixedFonts::default(), self.config)?;
        let mut h = Harness {
            ui,
            surface: RecordingSurface::new(size),
            frames: 0,
        };
        h.render()?;
        Ok(h)
    }
}

impl Harness {
    /// A harness builder. Defaults to a 400x300 window at 72 DPI, so point
    /// sizes equal pixel sizes.
    pub fn builder(root: NodeBuilder) -> HarnessBuilder {
        HarnessBuilder {
            root,
            config: UiConfig {
                dpi: 72.0,
                width: 400.0,
                height: 300.0,
                ..UiConfig::default()
            },
        }
    }

    /// A harness with default settings.
    pub fn new(root: NodeBuilder) -> Result<Self> {
        Self::builder(root).build()
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.ui.root()
    }

    /// Lay out to the window size and draw a frame.
    pub fn render(&mut self) -> Result<()> {
        self.ui.take_redraw();
        let size = self.ui.window_size();
        self.ui.layout(size.w, size.h)?;
        self.ui.draw(&mut self.surface)?;
        self.frames += 1;
        Ok(())
    }

    /// Dispatch an event, then render if it scheduled a repaint.
    pub fn event(&mut self, event: PlatformEvent) -> Result<()> {
        self.ui.dispatch(&event)?;
        if self.ui.needs_redraw() {
            self.render()?;
        }
        Ok(())
    }

    /// Move the pointer.
    pub fn mouse_move(&mut self, x: f64, y: f64) -> Result<()> {
        self.event(PlatformEvent::MouseMove {
            x,
            y,
            button: Button::None,
            mods: Mods::Empty,
        })
    }

    /// Press the left button.
    pub fn mouse_down(&mut self, x: f64, y: f64) -> Result<()> {
        self.event(PlatformEvent::MouseDown {
            x,
            y,
            button: Button::Left,
            mods: Mods::Empty,
        })
    }

    /// Release the left button.
    pub fn mouse_up(&mut self, x: f64, y: f64) -> Result<()> {
        self.event(PlatformEvent::MouseUp {
            x,
            y,
            button: Button::Left,
            mods: Mods::Empty,
        })
    }

    /// Move to, press, and release at a point.
    pub fn click(&mut self, x: f64, y: f64) -> Result<()> {
        self.mouse_move(x, y)?;
        self.mouse_down(x, y)?;
        self.mouse_up(x, y)
    }

    /// Press and release a key.
    pub fn key(&mut self, key: impl Into<Key>) -> Result<()> {
        let key = key.into();
        self.event(PlatformEvent::KeyDown {
            key,
            mods: Mods::Empty,
        })?;
        self.event(PlatformEvent::KeyUp {
            key,
            mods: Mods::Empty,
        })
    }

    /// Type a string as character events.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.event(PlatformEvent::Char { codepoint: c })?;
        }
        Ok(())
    }

    /// The first node in pre-order whose label or button text is `text`.
    pub fn find_text(&self, text: &str) -> Option<NodeId> {
        let tree = self.ui.tree();
        tree.descendants(tree.root()).into_iter().find(|id| {
            tree.node(*id).is_some_and(|n| match n.kind() {
                NodeKind::Label(s) => s.text == text,
                NodeKind::Button(s) => s.text == text,
                _ => false,
            })
        })
    }

    /// Absolute top-left corner of a node's padded box.
    pub fn screen_origin(&self, id: NodeId) -> Point {
        self.ui.tree().to_screen_point(id, Point::zero())
    }
}
