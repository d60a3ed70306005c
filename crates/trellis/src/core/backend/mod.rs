//! Interfaces to the font system and the windowing layer.

use trellis_geom::Size;

use crate::core::{
    builder::NodeConfig, error::Result, event::PlatformEvent, style::FontHandle,
};

/// Font lookup and text measurement.
pub trait FontBackend {
    /// Resolve a family and weight to a face.
    fn find_font(&self, family: &str, weight: u16) -> Option<FontHandle>;

    /// The same face at a new pixel size.
    fn font_scaled_to(&self, font: &FontHandle, pixel_size: f64) -> FontHandle;

    /// Advance width of `text`.
    fn measure_text(&self, font: &FontHandle, text: &str) -> f64;

    /// Line height.
    fn font_height(&self, font: &FontHandle) -> f64;
}

/// A blocking source of platform events.
pub trait EventSource {
    /// Wait for the next event.
    fn next_event(&mut self) -> Result<PlatformEvent>;
}

/// Font resolution for one pass, with the UI base font and DPI applied.
#[derive(Clone, Copy)]
pub struct Metrics<'a> {
    /// Backend.
    pub(crate) fonts: &'a dyn FontBackend,
    /// Fallback face.
    pub(crate) base_font: &'a FontHandle,
    /// Dots per inch for point-to-pixel conversion.
    pub(crate) dpi: f64,
}

impl<'a> Metrics<'a> {
    /// Construct metrics over a backend.
    pub fn new(fonts: &'a dyn FontBackend, base_font: &'a FontHandle, dpi: f64) -> Self {
        Self {
            fonts,
            base_font,
            dpi,
        }
    }

    /// The face a node draws with, scaled to its point size.
    pub fn font_for(&self, config: &NodeConfig) -> FontHandle {
        let face = config.font.as_ref().unwrap_or(self.base_font);
        self.fonts
            .font_scaled_to(face, config.font_size * self.dpi / 72.0)
    }

    /// Width and height of a single line of text.
    pub fn text_size(&self, font: &FontHandle, text: &str) -> Size {
        Size::new(
            self.fonts.measure_text(font, text),
            self.fonts.font_height(font),
        )
    }
}
