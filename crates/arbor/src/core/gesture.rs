//! Render-layer input, expressed as interaction state transformers.
//!
//! The free functions are pure: each maps a snapshot to the next one. A
//! [`Gesture`] bundles a transformer with a target path and knows how to
//! deliver it to a [`Runner`].

use std::fmt;

use crate::{
    error::{Error, Result},
    path::IdPath,
    runner::{Convergence, Runner},
    state::InteractionState,
};

/// Focus `id`.
pub fn focus(id: &IdPath, state: InteractionState) -> InteractionState {
    state.set_focused_id(Some(id.clone()))
}

/// Drop focus from `id`. Focus held by any other widget is untouched.
pub fn blur(id: &IdPath, state: InteractionState) -> InteractionState {
    if state.is_focused(id) {
        state.set_focused_id(None)
    } else {
        state
    }
}

/// Begin a press on `id`.
pub fn press(id: &IdPath, state: InteractionState) -> InteractionState {
    state.set_pressed_id(Some(id.clone()))
}

/// End any press.
pub fn release(state: InteractionState) -> InteractionState {
    state.set_pressed_id(None)
}

/// Replace the edit buffer, but only for the widget that is both active and
/// focused.
pub fn change_text(id: &IdPath, text: &str, state: InteractionState) -> InteractionState {
    if state.is_active(id) && state.is_focused(id) {
        state.set_input_buffer(Some(text.to_string()))
    } else {
        state
    }
}

/// Ask for focus to move to the widget after `id`.
pub fn request_focus_next(id: &IdPath, state: InteractionState) -> InteractionState {
    state.set_focus_next_requested_by(Some(id.clone()))
}

/// A gesture from the render layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// The widget gained focus.
    Focus(IdPath),
    /// The widget lost focus.
    Blur(IdPath),
    /// The widget was pressed and released.
    Press(IdPath),
    /// Text was edited in the widget.
    ChangeText(IdPath, String),
    /// Tab or submit in the widget.
    TabNext(IdPath),
}

impl Gesture {
    /// The widget the gesture is aimed at.
    pub fn target(&self) -> &IdPath {
        match self {
            Self::Focus(id)
            | Self::Blur(id)
            | Self::Press(id)
            | Self::ChangeText(id, _)
            | Self::TabNext(id) => id,
        }
    }

    /// Deliver the gesture.
    ///
    /// Returns the convergence report if anything was dispatched. Text edits
    /// only update the buffer, and a tab from an unfocused widget is ignored;
    /// both return `None`.
    pub fn apply<M: 'static>(&self, runner: &mut Runner<M>) -> Result<Option<Convergence>> {
        let id = self.target();
        if runner.tree().find(id).is_none() {
            return Err(Error::NotFound(id.route()));
        }
        tracing::debug!(gesture = %self, "applying gesture");
        let report = match self {
            Self::Focus(id) => Some(runner.dispatch(|s| focus(id, s))?),
            Self::Blur(id) => Some(runner.dispatch(|s| blur(id, s))?),
            Self::Press(id) => {
                let pressed = runner.dispatch(|s| press(id, s))?;
                let released = runner.dispatch(release)?;
                Some(pressed.merge(released))
            }
            Self::ChangeText(id, text) => {
                runner.update(|s| change_text(id, text, s));
                None
            }
            Self::TabNext(id) => {
                if runner.state().is_focused(id) {
                    Some(runner.dispatch(|s| request_focus_next(id, s))?)
                } else {
                    None
                }
            }
        };
        Ok(report)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Focus(id) => write!(f, "focus {}", id.route()),
            Self::Blur(id) => write!(f, "blur {}", id.route()),
            Self::Press(id) => write!(f, "press {}", id.route()),
            Self::ChangeText(id, text) => write!(f, "type {} {text:?}", id.route()),
            Self::TabNext(id) => write!(f, "tab {}", id.route()),
        }
    }
}
