use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Keyboard modifier state.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mods {
    /// Shift key state.
    pub shift: bool,
    /// Alt key state.
    pub alt: bool,
    /// Control key state.
    pub ctrl: bool,
}

#[allow(non_upper_case_globals)]
impl Mods {
    /// Modifier set with no modifiers.
    pub const Empty: Self = Self {
        shift: false,
        alt: false,
        ctrl: false,
    };
    /// Modifier set with shift only.
    pub const Shift: Self = Self {
        shift: true,
        alt: false,
        ctrl: false,
    };
    /// Modifier set with alt only.
    pub const Alt: Self = Self {
        shift: false,
        alt: true,
        ctrl: false,
    };
    /// Modifier set with control only.
    pub const Ctrl: Self = Self {
        shift: false,
        alt: false,
        ctrl: true,
    };

    /// True when no modifier is held.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.alt || self.ctrl)
    }
}

impl Add for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            shift: self.shift || other.shift,
            alt: self.alt || other.alt,
            ctrl: self.ctrl || other.ctrl,
        }
    }
}

/// A key identifier.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// A printable key.
    Char(char),
    /// Enter or Return.
    Enter,
    /// Escape.
    Esc,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// A function key.
    F(u8),
}

impl Key {
    /// Keys that activate a focused button.
    pub fn activates(&self) -> bool {
        matches!(self, Self::Enter | Self::Char(' '))
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}
