//! The widget builder DSL.
//!
//! A view function turns the application model into a [`WidgetBuilder`].
//! Building it against a [`BuildContext`] produces a [`Widget`]: the node
//! published to renderers plus the transition function the convergence loop
//! evaluates. Builders are consumed when built; the runner calls the view
//! function again for every rebuild.

/// Button widget.
mod button;
/// Container and list combinators.
mod container;
/// Text input widgets.
mod input;
/// Static text.
mod text;

pub use button::button;
pub use container::{container, list};
pub use input::{Validation, input, integer, string};
pub use text::text;

use crate::{context::BuildContext, next::Transition, node::Node, text::TranslatableText};

/// A built widget.
#[derive(Debug)]
pub struct Widget<M> {
    /// The node published to renderers.
    pub ui: Node,
    /// The widget's transition function.
    pub transition: Transition<M>,
}

impl<M> Widget<M> {
    /// A widget that never reacts to interaction.
    pub fn inert(ui: Node) -> Self {
        Self {
            ui,
            transition: Transition::inert(),
        }
    }
}

/// A deferred widget: a function from build context to [`Widget`].
pub struct WidgetBuilder<M>(Box<dyn FnOnce(&BuildContext) -> Widget<M>>);

impl<M: 'static> WidgetBuilder<M> {
    /// Wrap a build function.
    pub fn new(f: impl FnOnce(&BuildContext) -> Widget<M> + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Build against `ctx`.
    pub fn build(self, ctx: &BuildContext) -> Widget<M> {
        (self.0)(ctx)
    }

    /// Build this widget in a scope extended by `segment`.
    pub fn id(self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        Self::new(move |ctx| ctx.with_pushed_id(segment, |c| self.build(c)))
    }

    /// Build this widget with interaction enabled or disabled. The flag
    /// replaces the enclosing scope's.
    pub fn enabled(self, enabled: bool) -> Self {
        Self::new(move |ctx| ctx.with_enabled(enabled, |c| self.build(c)))
    }

    /// Attach a label, used by buttons and inputs.
    pub fn label(self, label: impl Into<TranslatableText>) -> Self {
        let label = label.into();
        Self::new(move |ctx| ctx.with_label(label, |c| self.build(c)))
    }
}
