use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use trellis_geom::{Point, Rect, Size};

use crate::core::{
    backend::{EventSource, FontBackend},
    error::Result,
    event::PlatformEvent,
    render::Surface,
    style::{FontHandle, Paint},
};

/// Font backend with fixed metrics: every character advances by a fixed
/// fraction of the pixel size, and line height equals the pixel size.
#[derive(Debug, Clone)]
pub struct FixedFonts {
    /// Families that resolve.
    families: Vec<String>,
    /// Advance per character as a fraction of the pixel size.
    advance: f64,
}

impl Default for FixedFonts {
    fn default() -> Self {
        Self {
            families: vec!["system-ui".into(), "fixed".into()],
            advance: 0.5,
        }
    }
}

impl FixedFonts {
    /// A backend that resolves only `families`.
    pub fn with_families<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            families: families.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl FontBackend for FixedFonts {
    fn find_font(&self, family: &str, _weight: u16) -> Option<FontHandle> {
        let face = self.families.iter().position(|f| f == family)?;
        Some(FontHandle {
            face: u32::try_from(face).ok()?,
            family: family.into(),
            pixel_size: 0.0,
        })
    }

    fn font_scaled_to(&self, font: &FontHandle, pixel_size: f64) -> FontHandle {
        FontHandle {
            pixel_size,
            ..font.clone()
        }
    }

    fn measure_text(&self, font: &FontHandle, text: &str) -> f64 {
        text.chars().count() as f64 * font.pixel_size * self.advance
    }

    fn font_height(&self, font: &FontHandle) -> f64 {
        font.pixel_size
    }
}

/// A drawing operation recorded by [`RecordingSurface`]. Geometry is in
/// absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The whole surface `rect` was cleared.
    Clear {
        /// Surface bounds.
        rect: Rect,
        /// Paint.
        paint: Paint,
    },
    /// A rounded rectangle path was set.
    Path {
        /// Rectangle.
        rect: Rect,
        /// Corner radius.
        radius: f64,
    },
    /// The current path was filled.
    Fill {
        /// Paint.
        paint: Paint,
    },
    /// The current path was stroked.
    Stroke {
        /// Paint.
        paint: Paint,
        /// Line width.
        width: f64,
    },
    /// Text was printed.
    Text {
        /// Top-left corner.
        at: Point,
        /// The text.
        text: String,
        /// Font pixel size.
        pixel_size: f64,
    },
    /// A sub-surface was opened.
    Push {
        /// Sub-surface bounds.
        rect: Rect,
    },
    /// A sub-surface was released.
    Release,
    /// A frame was presented.
    Present,
}

/// A surface that records every operation into a shared log.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    /// Absolute bounds of this surface.
    bounds: Rect,
    /// Shared command log.
    log: Rc<RefCell<Vec<DrawCommand>>>,
}

impl RecordingSurface {
    /// A root surface of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, size.w, size.h),
            log: Rc::default(),
        }
    }

    /// Append a command.
    fn push(&self, cmd: DrawCommand) {
        self.log.borrow_mut().push(cmd);
    }

    /// All recorded commands.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.borrow().clone()
    }

    /// Recorded text with absolute positions.
    pub fn texts(&self) -> Vec<(Point, String)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { at, text, .. } => Some((*at, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded commands.
    pub fn reset(&self) {
        self.log.borrow_mut().clear();
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, paint: &Paint) -> Result<()> {
        self.push(DrawCommand::Clear {
            rect: self.bounds,
            paint: *paint,
        });
        Ok(())
    }

    fn rounded_rect_path(&mut self, rect: Rect, rx: f64, _ry: f64) -> Result<()> {
        self.push(DrawCommand::Path {
            rect: rect.shift(self.bounds.tl),
            radius: rx,
        });
        Ok(())
    }

    fn fill_path(&mut self, paint: &Paint) -> Result<()> {
        self.push(DrawCommand::Fill { paint: *paint });
        Ok(())
    }

    fn stroke_path(&mut self, paint: &Paint, width: f64) -> Result<()> {
        self.push(DrawCommand::Stroke {
            paint: *paint,
            width,
        });
        Ok(())
    }

    fn print_text(&mut self, font: &FontHandle, at: Point, text: &str, _paint: &Paint) -> Result<()> {
        self.push(DrawCommand::Text {
            at: at + self.bounds.tl,
            text: text.into(),
            pixel_size: font.pixel_size,
        });
        Ok(())
    }

    fn sub_surface(&mut self, rect: Rect) -> Result<Box<dyn Surface + '_>> {
        let bounds = rect.shift(self.bounds.tl);
        self.push(DrawCommand::Push { rect: bounds });
        Ok(Box::new(Self {
            bounds,
            log: Rc::clone(&self.log),
        }))
    }

    fn release(&mut self) {
        self.push(DrawCommand::Release);
    }

    fn present(&mut self) -> Result<()> {
        self.push(DrawCommand::Present);
        Ok(())
    }
}

/// An event source that replays a fixed script, then reports `Close`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    /// Remaining events.
    events: VecDeque<PlatformEvent>,
}

impl ScriptedEvents {
    /// A source replaying `events` in order.
    pub fn new(events: impl IntoIterator<Item = PlatformEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> Result<PlatformEvent> {
        Ok(self.events.pop_front().unwrap_or(PlatformEvent::Close))
    }
}
