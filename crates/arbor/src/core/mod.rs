//! Core types for the arbor interaction engine.

/// Folding child transitions.
pub mod container;
/// Build-time context.
pub mod context;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Render-layer gestures.
pub mod gesture;
/// The interactive widget protocol.
pub mod interactive;
/// Transition results and effects.
pub mod next;
/// The widget tree.
pub mod node;
/// Structural widget identifiers.
pub mod path;
/// View subscriptions.
pub mod publish;
/// The convergence loop.
pub mod runner;
/// Interaction state.
pub mod state;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Translatable text.
pub mod text;
/// Per-run protocol tracing.
pub mod trace;
/// Widget views for renderers.
pub mod view;
