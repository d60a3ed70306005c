//! Platform events delivered to [`crate::Ui::dispatch`].

/// Keyboard types.
pub mod key;
/// Mouse types.
pub mod mouse;

use serde::{Deserialize, Serialize};

pub use key::{Key, Mods};
pub use mouse::Button;

/// An event delivered by the windowing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEvent {
    /// The window changed size.
    Resize {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
    /// The platform asked for a repaint.
    RedrawRequested,
    /// A mouse button went down.
    MouseDown {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
        /// Button pressed.
        #[serde(default)]
        button: Button,
        /// Active modifiers.
        #[serde(default)]
        mods: Mods,
    },
    /// A mouse button was released.
    MouseUp {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
        /// Button released.
        #[serde(default)]
        button: Button,
        /// Active modifiers.
        #[serde(default)]
        mods: Mods,
    },
    /// The pointer moved.
    MouseMove {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
        /// Button held, if any.
        #[serde(default)]
        button: Button,
        /// Active modifiers.
        #[serde(default)]
        mods: Mods,
    },
    /// A key went down.
    KeyDown {
        /// Key.
        key: Key,
        /// Active modifiers.
        #[serde(default)]
        mods: Mods,
    },
    /// A key was released.
    KeyUp {
        /// Key.
        key: Key,
        /// Active modifiers.
        #[serde(default)]
        mods: Mods,
    },
    /// A character was typed.
    Char {
        /// The typed character.
        codepoint: char,
    },
    /// The window is closing.
    Close,
}
