use serde::{Deserialize, Serialize};

/// Color space a [`Color`] is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Red, green, blue in `[0, 1]`.
    Srgb,
    /// Lightness, chroma, hue in the CIE LCh(ab) space, each scaled to `[0, 1]`.
    Lchab,
}

/// A color. Interpretation is left to the drawing backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Color space of the components.
    pub space: ColorSpace,
    /// Components.
    pub v: [f32; 3],
    /// Alpha in `[0, 1]`.
    pub alpha: f32,
}

impl Color {
    /// An opaque sRGB color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            space: ColorSpace::Srgb,
            v: [r, g, b],
            alpha: 1.0,
        }
    }

    /// An opaque LCh(ab) color.
    pub const fn lch(l: f32, c: f32, h: f32) -> Self {
        Self {
            space: ColorSpace::Lchab,
            v: [l, c, h],
            alpha: 1.0,
        }
    }
}

/// Something a surface can fill or stroke with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    /// A flat color.
    Solid(Color),
}

impl Paint {
    /// A solid paint from an LCh(ab) triple.
    pub const fn lch(l: f32, c: f32, h: f32) -> Self {
        Self::Solid(Color::lch(l, c, h))
    }

    /// A solid paint from an sRGB triple.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::Solid(Color::rgb(r, g, b))
    }
}

/// Default foreground: near-black text.
pub const FOREGROUND: Paint = Paint::lch(0.125, 0.0, 0.0);
/// Default border color.
pub const BORDER: Paint = FOREGROUND;
/// Neutral control face.
pub const FACE: Paint = Paint::lch(0.8, 0.0, 0.0);
/// Control face while pressed.
pub const FACE_PRESSED: Paint = Paint::lch(0.5, 0.9, 0.775);
/// Control face while hovered.
pub const FACE_HOVERED: Paint = Paint::lch(0.8, 0.9, 0.775);

/// A backend-resolved font at a specific pixel size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontHandle {
    /// Backend-defined face identifier.
    pub face: u32,
    /// Family the face was resolved from.
    pub family: String,
    /// Pixel size; 0 for an unscaled face.
    pub pixel_size: f64,
}
