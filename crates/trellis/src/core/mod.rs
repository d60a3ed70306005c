//! Core types for the trellis box engine.

/// Font and event-source backend interfaces.
pub mod backend;
/// Node construction and per-kind defaults.
pub mod builder;
/// Routing of platform events to node handlers.
mod dispatch;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Handler slots and invocation arguments.
pub mod handlers;
/// Node ID types.
pub mod id;
/// Hover, focus, and drag tracking.
pub mod interaction;
/// Measure and pack passes.
pub mod layout;
/// Node data stored in the arena.
pub mod node;
/// The render walker and drawing surface interface.
pub mod render;
/// Blocking event loop.
pub mod runloop;
/// Paints, colors, and font handles.
pub mod style;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// The node arena.
pub mod tree;
/// The top-level UI object.
pub mod ui;

pub use builder::NodeBuilder;
pub use id::NodeId;
pub use interaction::Interaction;
pub use tree::Tree;
pub use ui::{Context, Ui, UiConfig};
