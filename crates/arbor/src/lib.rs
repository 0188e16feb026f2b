//! Arbor: a single-active-widget interaction engine.
//!
//! Applications describe their UI as a pure function from a model to a tree
//! of widget builders. Arbor builds the tree, tracks which widget is focused,
//! pressed and active in a single [`InteractionState`](state::InteractionState),
//! and after every input runs the tree to a fixpoint, executing any side
//! effects widgets raise along the way.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Runner`] - owns the model, tree and state and runs the convergence loop
//! - [`widgets`] - the builder DSL (`text`, `button`, `input`, `container`, ...)
//! - [`Gesture`](gesture::Gesture) - input from a render layer
//!
//! ```
//! use arbor::{Runner, gesture::Gesture, tr, widgets::{button, container, integer}};
//!
//! let view = |count: &i64| {
//!     container(vec![
//!         integer(*count, |m: &mut i64, n| *m = n).id("count"),
//!         button(|m: &mut i64| *m += 1).label(tr!("Add")).id("add"),
//!     ])
//! };
//! let mut runner = Runner::new(0, view).unwrap();
//! Gesture::Press("/add".into()).apply(&mut runner).unwrap();
//! assert_eq!(runner.model(), &1);
//! ```

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

pub mod widgets;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
pub use core::{
    container, context, dump, error, gesture, interactive, next, node, path, publish, runner,
    state, text, trace, view,
};

pub use runner::{Config, Convergence, Runner, RunnerBuilder};
