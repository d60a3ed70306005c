/// Backends for tests: fonts, surfaces, and event sources.
pub mod backend;
/// Harness for driving a UI in tests.
pub mod harness;

pub use backend::{DrawCommand, FixedFonts, RecordingSurface, ScriptedEvents};
pub use harness::{Harness, HookLog};
