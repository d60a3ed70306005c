//! Buttons: a pressable face with an optional text caption.
//!
//! A button becomes pressed on a left mouse-down while enabled and is
//! released on mouse-up or when the pointer leaves it. It fires its click
//! hook on a release that follows its own press, or on Enter or Space while
//! focused unless it handles key-down itself.

use trellis_geom::Size;

use crate::core::{
    backend::Metrics,
    error::Result,
    event::Button,
    handlers::{KeyInput, MouseInput},
    id::NodeId,
    node::{Node, NodeKind},
    render::Surface,
    style::{FACE, FACE_HOVERED, FACE_PRESSED, FontHandle, Paint},
    ui::Ui,
};
use crate::widgets::label::centered;

/// Button state.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonState {
    /// Caption; empty when the button wraps children instead.
    pub text: String,
    /// Currently held down.
    pub pressed: bool,
    /// Accepts presses and fires clicks.
    pub enabled: bool,
    /// Face paint at rest.
    pub face: Paint,
    /// Face paint while pressed.
    pub pressed_face: Paint,
    /// Face paint while hovered.
    pub hovered_face: Paint,
}

impl ButtonState {
    /// An enabled, unpressed button.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pressed: false,
            enabled: true,
            face: FACE,
            pressed_face: FACE_PRESSED,
            hovered_face: FACE_HOVERED,
        }
    }

    /// The face paint for the current state.
    pub fn current_face(&self, hovered: bool) -> &Paint {
        if self.pressed {
            &self.pressed_face
        } else if hovered {
            &self.hovered_face
        } else {
            &self.face
        }
    }
}

/// Content size of the caption.
pub(crate) fn measure(state: &ButtonState, font: &FontHandle, metrics: &Metrics<'_>) -> Size {
    metrics.text_size(font, &state.text)
}

/// Paint the face and the centered caption.
pub(crate) fn draw(
    node: &Node,
    state: &ButtonState,
    font: &FontHandle,
    surface: &mut dyn Surface,
) -> Result<()> {
    surface.clear(state.current_face(node.hovered()))?;
    if !state.text.is_empty() {
        surface.print_text(
            font,
            centered(node.size(), node.content()),
            &state.text,
            &node.config().fg,
        )?;
    }
    Ok(())
}

/// Button state of a node, if it is a button.
fn state_mut(ui: &mut Ui, id: NodeId) -> Option<&mut ButtonState> {
    match ui.tree_mut().node_mut(id)?.kind_mut() {
        NodeKind::Button(state) => Some(state),
        _ => None,
    }
}

/// Mouse-down reaction.
pub(crate) fn press(ui: &mut Ui, id: NodeId, m: &MouseInput) -> Result<()> {
    let Some(state) = state_mut(ui, id) else {
        return Ok(());
    };
    if state.enabled && m.button == Button::Left && !state.pressed {
        state.pressed = true;
        ui.dirty(id)?;
    }
    Ok(())
}

/// Release a pressed button, returning whether it was pressed.
pub(crate) fn release(ui: &mut Ui, id: NodeId) -> Result<bool> {
    let Some(state) = state_mut(ui, id) else {
        return Ok(false);
    };
    if !state.pressed {
        return Ok(false);
    }
    state.pressed = false;
    ui.dirty(id)?;
    Ok(true)
}

/// May a release over `node` fire its click hook?
pub(crate) fn allows_click(node: &Node, was_pressed: bool) -> bool {
    match node.kind() {
        NodeKind::Button(state) => state.enabled && was_pressed,
        _ => true,
    }
}

/// Does this key press activate the node as a button?
pub(crate) fn activates(node: &Node, k: &KeyInput) -> bool {
    match node.kind() {
        NodeKind::Button(state) => {
            state.enabled
                && node.handlers.key_down.is_none()
                && k.key.activates()
                && k.mods.is_empty()
        }
        _ => false,
    }
}
