//! The control-flow result of a transition function.

use std::{fmt, rc::Rc};

use crate::{state::InteractionState, trace::Tracer};

/// An externally visible side effect, such as committing an edited value to
/// the application model. Running it yields the snapshot to continue from.
pub struct Effect<M> {
    /// Short description used in logs and traces.
    name: String,
    /// The work itself.
    run: Box<dyn FnOnce(&mut M) -> InteractionState>,
}

impl<M> Effect<M> {
    /// Construct an effect.
    pub fn new(
        name: impl Into<String>,
        run: impl FnOnce(&mut M) -> InteractionState + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }

    /// Effect description.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the effect to completion against the model.
    pub fn run(self, model: &mut M) -> InteractionState {
        (self.run)(model)
    }
}

impl<M> fmt::Debug for Effect<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect").field("name", &self.name).finish()
    }
}

/// What a widget wants to happen after looking at a snapshot.
pub enum Next<M> {
    /// Nothing to do.
    Halt,
    /// Adopt this snapshot and evaluate again.
    Continue(InteractionState),
    /// Run this effect, adopt the snapshot it produces, rebuild the tree and
    /// evaluate again.
    SuspendAndResume(Effect<M>),
}

impl<M> Next<M> {
    /// Is this a halt?
    pub fn is_halt(&self) -> bool {
        matches!(self, Self::Halt)
    }

    /// The proposed snapshot, if this is a continue.
    pub fn state(&self) -> Option<&InteractionState> {
        match self {
            Self::Continue(s) => Some(s),
            _ => None,
        }
    }
}

impl<M> fmt::Debug for Next<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halt => write!(f, "Halt"),
            Self::Continue(s) => f.debug_tuple("Continue").field(s).finish(),
            Self::SuspendAndResume(e) => f.debug_tuple("SuspendAndResume").field(e).finish(),
        }
    }
}

/// The signature every transition function shares.
type StepFn<M> = dyn Fn(&InteractionState, &mut Tracer) -> Next<M>;

/// A widget's per-frame transition function.
///
/// Inert transitions belong to widgets that never react to interaction. They
/// always halt, and containers can recognise them without evaluating anything.
pub struct Transition<M> {
    /// The function, or `None` when inert.
    step: Option<Rc<StepFn<M>>>,
}

impl<M> Transition<M> {
    /// A transition that always halts.
    pub fn inert() -> Self {
        Self { step: None }
    }

    /// Wrap a transition function.
    pub fn new(f: impl Fn(&InteractionState, &mut Tracer) -> Next<M> + 'static) -> Self {
        Self {
            step: Some(Rc::new(f)),
        }
    }

    /// Is this transition statically known to halt?
    pub fn is_inert(&self) -> bool {
        self.step.is_none()
    }

    /// Evaluate against a snapshot.
    pub fn step(&self, state: &InteractionState, tracer: &mut Tracer) -> Next<M> {
        match &self.step {
            Some(f) => f(state, tracer),
            None => Next::Halt,
        }
    }
}

impl<M> Clone for Transition<M> {
    fn clone(&self) -> Self {
        Self {
            step: self.step.clone(),
        }
    }
}

impl<M> fmt::Debug for Transition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inert() {
            write!(f, "Transition(inert)")
        } else {
            write!(f, "Transition")
        }
    }
}
