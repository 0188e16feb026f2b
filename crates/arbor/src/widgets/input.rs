use std::rc::Rc;

use crate::{
    interactive::{Behavior, Interactive},
    next::{Effect, Next},
    node::Node,
    path::IdPath,
    state::{InputBufferState, InteractionState},
};

use super::{Widget, WidgetBuilder};

/// Outcome of validating an input buffer: the value to commit, or an error
/// description.
pub type Validation = Result<String, String>;

/// Text editing for inputs.
struct Edit<M> {
    /// Commit a validated value to the model.
    on_change: Rc<dyn Fn(&mut M, String)>,
    /// Check and normalize a buffer.
    validate: Rc<dyn Fn(&str) -> Validation>,
}

impl<M: 'static> Behavior<M> for Edit<M> {
    fn wants_activate(&self, id: &IdPath, state: &InteractionState) -> bool {
        state.is_focused(id)
    }

    fn wants_deactivate(&self, id: &IdPath, state: &InteractionState) -> bool {
        !state.is_focused(id)
    }

    fn on_deactivation(&self, id: &IdPath, state: &InteractionState) -> Next<M> {
        let Some(buffer) = state.input_buffer() else {
            return Next::Continue(state.clone().set_active_id(None));
        };

        let validated = (self.validate)(buffer);
        let validity = match validated {
            Ok(_) => InputBufferState::Valid,
            Err(_) => InputBufferState::Invalid,
        };
        if validity != state.input_buffer_state() {
            tracing::debug!(path = %id, %validity, "input validity changed");
            return Next::Continue(state.clone().set_input_buffer_state(validity));
        }

        match validated {
            Ok(value) => {
                let on_change = self.on_change.clone();
                let next = state.clone().set_input_buffer(None);
                Next::SuspendAndResume(Effect::new(format!("commit {id}"), move |m| {
                    on_change(m, value);
                    next
                }))
            }
            // Invalid buffers are held until edited.
            Err(_) => Next::Halt,
        }
    }
}

/// A text input showing `value`.
///
/// The input activates while focused. Edits accumulate in the interaction
/// state's buffer and are committed when the input loses focus: `validate`
/// checks the buffer, and a valid result is passed to `on_change`. An invalid
/// buffer keeps the input active and marks the buffer invalid until it is
/// edited again.
pub fn input<M: 'static>(
    value: impl Into<String>,
    on_change: impl Fn(&mut M, String) + 'static,
    validate: impl Fn(&str) -> Validation + 'static,
) -> WidgetBuilder<M> {
    let value = value.into();
    let behavior = Edit {
        on_change: Rc::new(on_change),
        validate: Rc::new(validate),
    };
    WidgetBuilder::new(move |ctx| {
        let id = ctx.current_path().clone();
        Widget {
            ui: Node::Input {
                id: id.clone(),
                label: ctx.label().cloned(),
                value,
                enabled: ctx.enabled(),
            },
            transition: Interactive::new(id, ctx.enabled(), behavior).into(),
        }
    })
}

/// Accept non-negative integers that fit an `i64`.
fn validate_integer(s: &str) -> Validation {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("not an integer: {s:?}"));
    }
    s.parse::<i64>()
        .map(|n| n.to_string())
        .map_err(|e| format!("{s:?}: {e}"))
}

/// An input holding an integer.
pub fn integer<M: 'static>(value: i64, on_change: impl Fn(&mut M, i64) + 'static) -> WidgetBuilder<M> {
    input(
        value.to_string(),
        move |m, v: String| match v.parse::<i64>() {
            Ok(n) => on_change(m, n),
            Err(e) => tracing::warn!(value = %v, error = %e, "discarding unparseable integer"),
        },
        validate_integer,
    )
}

/// An input holding free text. Every buffer is valid.
pub fn string<M: 'static>(
    value: impl Into<String>,
    on_change: impl Fn(&mut M, String) + 'static,
) -> WidgetBuilder<M> {
    input(value, on_change, |s| Ok(s.to_string()))
}
