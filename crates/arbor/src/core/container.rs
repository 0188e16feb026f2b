//! Folding child transitions into one.

use crate::{
    next::{Next, Transition},
    state::InteractionState,
    trace::Tracer,
};

/// Evaluate `children` left to right against `initial`.
///
/// A continuing child's snapshot is adopted before its next sibling runs, and
/// halting children are skipped. The first child that suspends ends the
/// reduction and its effect is returned as-is. Otherwise the result is
/// `Continue` with the final snapshot if it differs from `initial`, and `Halt`
/// if it does not.
pub fn reduce<M>(
    children: &[Transition<M>],
    initial: &InteractionState,
    tracer: &mut Tracer,
) -> Next<M> {
    let mut current: Option<InteractionState> = None;
    for child in children.iter().filter(|c| !c.is_inert()) {
        let state = current.as_ref().unwrap_or(initial);
        match child.step(state, tracer) {
            Next::Halt => {}
            Next::Continue(next) => current = Some(next),
            suspend @ Next::SuspendAndResume(_) => return suspend,
        }
    }
    match current {
        Some(state) if state != *initial => Next::Continue(state),
        _ => Next::Halt,
    }
}

/// Combine child transitions into a single transition.
///
/// When every child is inert the result is inert too, so static subtrees cost
/// nothing to evaluate.
pub fn combine<M: 'static>(children: Vec<Transition<M>>) -> Transition<M> {
    if children.iter().all(Transition::is_inert) {
        return Transition::inert();
    }
    Transition::new(move |state, tracer| reduce(&children, state, tracer))
}
