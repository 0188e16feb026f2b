//! The state machine shared by every interactive widget kind.
//!
//! Each kind supplies a [`Behavior`]: when it wants to activate or deactivate
//! and what happens on activation, while active, on deactivation and while
//! inactive. [`Interactive`] wraps a behavior with the protocol that decides
//! which of those hooks runs for a given snapshot. The protocol handles, in
//! priority order:
//!
//! 1. consuming this widget's own focus-next request,
//! 2. disabled widgets, which only ever see `when_not_active`,
//! 3. claiming pending autofocus,
//! 4. the active widget: deactivation, keep-alive, then `when_active`,
//! 5. inactive widgets: activation, then `when_not_active`.

use std::marker::PhantomData;

use crate::{
    next::{Next, Transition},
    path::IdPath,
    state::InteractionState,
    trace::{Step, Tracer},
};

/// Kind-specific hooks for an interactive widget.
///
/// The defaults describe a widget that activates and deactivates by simply
/// taking and releasing the active id, and does nothing otherwise.
pub trait Behavior<M> {
    /// Does the inactive widget want to become active?
    fn wants_activate(&self, id: &IdPath, state: &InteractionState) -> bool;

    /// Does the active widget want to release activation?
    fn wants_deactivate(&self, id: &IdPath, state: &InteractionState) -> bool;

    /// Called when activation is allowed and wanted.
    fn on_activation(&self, id: &IdPath, state: &InteractionState) -> Next<M> {
        Next::Continue(state.clone().set_active_id(Some(id.clone())))
    }

    /// Called while active, once aliveness has been re-asserted.
    fn when_active(&self, _id: &IdPath, _state: &InteractionState) -> Next<M> {
        Next::Halt
    }

    /// Called when deactivation is wanted. Returning [`Next::Halt`] declines:
    /// the widget stays active and keeps itself alive.
    fn on_deactivation(&self, _id: &IdPath, state: &InteractionState) -> Next<M> {
        Next::Continue(state.clone().set_active_id(None))
    }

    /// Called while inactive, or whenever the widget is disabled.
    fn when_not_active(&self, _id: &IdPath, _state: &InteractionState) -> Next<M> {
        Next::Halt
    }
}

/// A behavior bound to a widget's path and enabled flag.
pub struct Interactive<M, B> {
    /// Path of the widget this protocol instance belongs to.
    id: IdPath,
    /// Whether the widget was built in an enabled scope.
    enabled: bool,
    /// Kind-specific hooks.
    behavior: B,
    /// Model type the behavior's effects operate on.
    _model: PhantomData<fn(&mut M)>,
}

impl<M, B> Interactive<M, B>
where
    B: Behavior<M>,
{
    /// Bind `behavior` to a widget.
    pub fn new(id: IdPath, enabled: bool, behavior: B) -> Self {
        Self {
            id,
            enabled,
            behavior,
            _model: PhantomData,
        }
    }

    /// The widget path.
    pub fn id(&self) -> &IdPath {
        &self.id
    }

    /// Evaluate the protocol against a snapshot.
    pub fn step(&self, state: &InteractionState, tracer: &mut Tracer) -> Next<M> {
        let id = &self.id;

        if state.has_requested_focus_next(id) {
            tracer.record(id, Step::FocusNextClaimed);
            return Next::Continue(
                state
                    .clone()
                    .set_focus_next_requested_by(None)
                    .set_auto_focus(true),
            );
        }

        if !self.enabled {
            return self.behavior.when_not_active(id, state);
        }

        if state.auto_focus() {
            tracer.record(id, Step::AutoFocusClaimed);
            return Next::Continue(
                state
                    .clone()
                    .set_focused_id(Some(id.clone()))
                    .set_auto_focus(false),
            );
        }

        if state.is_active(id) {
            self.step_active(state, tracer)
        } else if state.can_activate(id) && self.behavior.wants_activate(id, state) {
            tracer.record(id, Step::Activating);
            self.behavior.on_activation(id, state)
        } else {
            self.behavior.when_not_active(id, state)
        }
    }

    /// The active branch of the protocol.
    fn step_active(&self, state: &InteractionState, tracer: &mut Tracer) -> Next<M> {
        let id = &self.id;
        if state.can_deactivate(id) && self.behavior.wants_deactivate(id, state) {
            tracer.record(id, Step::Deactivating);
            match self.behavior.on_deactivation(id, state) {
                Next::Halt => tracer.record(id, Step::DeactivationDeclined),
                next => return next,
            }
        }

        if state.active_id_is_alive().is_none() {
            tracer.record(id, Step::KeepAlive);
            return Next::Continue(state.clone().set_active_id_is_alive(Some(id.clone())));
        }

        self.behavior.when_active(id, state)
    }
}

impl<M, B> From<Interactive<M, B>> for Transition<M>
where
    M: 'static,
    B: Behavior<M> + 'static,
{
    fn from(widget: Interactive<M, B>) -> Self {
        Self::new(move |state, tracer| widget.step(state, tracer))
    }
}
