//! Trellis: retained-mode box layout and input routing.
//!
//! A tree of boxes is measured bottom-up, packed top-down into the space a
//! window offers, and painted through an abstract drawing [`Surface`].
//! Platform events are routed to nodes through a single [`Ui::dispatch`]
//! entry point that tracks hover, focus, and drag state.
//!
//! # Quick Start
//!
//! - [`NodeBuilder`] - Describe a subtree with per-node sizing and handlers
//! - [`Ui`] - Own the tree, the interaction state, and the font backend
//! - [`runloop`] - Drive a `Ui` from an [`EventSource`]
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Point, Size, Rect, Axis)
//! - [`widgets`] - Node kinds with their own measurement and drawing

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

/// Geometry primitives.
pub mod geom {
    pub use trellis_geom::*;
}
pub mod widgets;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
// Re-export core types
pub use core::{Context, Interaction, NodeBuilder, NodeId, Tree, Ui, UiConfig};
pub use core::{
    backend::{EventSource, FontBackend},
    interaction::InteractionManager,
    render::Surface,
    runloop::runloop,
};
// Re-export submodules that users may need to access directly
pub use core::{
    backend, builder, dump, error, event, handlers, interaction, layout, node, render, style,
};
