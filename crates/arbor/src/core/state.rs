use std::fmt;

use crate::path::IdPath;

/// Validity tag for the text-edit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputBufferState {
    /// The buffer is empty or passed validation.
    #[default]
    Valid,
    /// The buffer failed validation on the last deactivation attempt.
    Invalid,
}

impl fmt::Display for InputBufferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// The cross-frame interaction snapshot.
///
/// There is exactly one of these per runner. It survives tree rebuilds and is
/// never modified in place: every setter consumes the snapshot and returns
/// the next one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    /// The widget allowed to perform edits or commit actions.
    active_id: Option<IdPath>,
    /// Set by the active widget each run to prove it is still present.
    active_id_is_alive: Option<IdPath>,
    /// Whether the active button already fired during this activation.
    active_id_was_pressed_before: bool,
    /// The widget currently under a press gesture.
    pressed_id: Option<IdPath>,
    /// The widget receiving keyboard attention. Independent of activation.
    focused_id: Option<IdPath>,
    /// A widget that asked for focus to move to its successor.
    focus_next_requested_by: Option<IdPath>,
    /// When set, the next enabled interactive widget claims focus.
    auto_focus: bool,
    /// Uncommitted text for the active input.
    input_buffer: Option<String>,
    /// Validity tag for `input_buffer`.
    input_buffer_state: InputBufferState,
}

impl InteractionState {
    /// The initial snapshot: nothing active, focused or pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active widget.
    pub fn active_id(&self) -> Option<&IdPath> {
        self.active_id.as_ref()
    }

    /// The widget that re-asserted aliveness this run.
    pub fn active_id_is_alive(&self) -> Option<&IdPath> {
        self.active_id_is_alive.as_ref()
    }

    /// Has the active widget already fired during this activation?
    pub fn active_id_was_pressed_before(&self) -> bool {
        self.active_id_was_pressed_before
    }

    /// The pressed widget.
    pub fn pressed_id(&self) -> Option<&IdPath> {
        self.pressed_id.as_ref()
    }

    /// The focused widget.
    pub fn focused_id(&self) -> Option<&IdPath> {
        self.focused_id.as_ref()
    }

    /// The widget that requested focus to move on.
    pub fn focus_next_requested_by(&self) -> Option<&IdPath> {
        self.focus_next_requested_by.as_ref()
    }

    /// Is a focus claim pending?
    pub fn auto_focus(&self) -> bool {
        self.auto_focus
    }

    /// Uncommitted input text.
    pub fn input_buffer(&self) -> Option<&str> {
        self.input_buffer.as_deref()
    }

    /// Validity of the input buffer.
    pub fn input_buffer_state(&self) -> InputBufferState {
        self.input_buffer_state
    }

    /// Change the active widget.
    ///
    /// Aliveness follows the new id. When the id actually changes the input
    /// buffer is discarded and the pressed-before guard is reset; setting the
    /// current id again leaves both untouched.
    #[must_use]
    pub fn set_active_id(self, active_id: Option<IdPath>) -> Self {
        let same = active_id == self.active_id;
        let was_pressed_before = active_id.is_some() && same && self.active_id_was_pressed_before;
        let (input_buffer, input_buffer_state) = if same {
            (self.input_buffer, self.input_buffer_state)
        } else {
            (None, InputBufferState::Valid)
        };
        Self {
            active_id_is_alive: active_id.clone(),
            active_id,
            active_id_was_pressed_before: was_pressed_before,
            input_buffer,
            input_buffer_state,
            ..self
        }
    }

    /// Record which widget re-asserted aliveness.
    #[must_use]
    pub fn set_active_id_is_alive(self, active_id_is_alive: Option<IdPath>) -> Self {
        Self {
            active_id_is_alive,
            ..self
        }
    }

    /// Set the pressed-before guard.
    #[must_use]
    pub fn set_active_id_was_pressed_before(self, active_id_was_pressed_before: bool) -> Self {
        Self {
            active_id_was_pressed_before,
            ..self
        }
    }

    /// Set the pressed widget.
    #[must_use]
    pub fn set_pressed_id(self, pressed_id: Option<IdPath>) -> Self {
        Self { pressed_id, ..self }
    }

    /// Set the focused widget.
    #[must_use]
    pub fn set_focused_id(self, focused_id: Option<IdPath>) -> Self {
        Self { focused_id, ..self }
    }

    /// Set or clear the focus-next request.
    #[must_use]
    pub fn set_focus_next_requested_by(self, focus_next_requested_by: Option<IdPath>) -> Self {
        Self {
            focus_next_requested_by,
            ..self
        }
    }

    /// Set the autofocus flag.
    #[must_use]
    pub fn set_auto_focus(self, auto_focus: bool) -> Self {
        Self { auto_focus, ..self }
    }

    /// Replace the input buffer. Any edit makes the buffer provisionally valid.
    #[must_use]
    pub fn set_input_buffer(self, input_buffer: Option<String>) -> Self {
        Self {
            input_buffer,
            input_buffer_state: InputBufferState::Valid,
            ..self
        }
    }

    /// Record the validity of the current buffer without touching its value.
    #[must_use]
    pub fn set_input_buffer_state(self, input_buffer_state: InputBufferState) -> Self {
        Self {
            input_buffer_state,
            ..self
        }
    }

    /// Start a convergence run: the active widget must prove it is alive again.
    #[must_use]
    pub fn new_frame(self) -> Self {
        self.set_active_id_is_alive(None)
    }

    /// Is `id` the active widget?
    pub fn is_active(&self, id: &IdPath) -> bool {
        self.active_id.as_ref() == Some(id)
    }

    /// Is `id` the focused widget?
    pub fn is_focused(&self, id: &IdPath) -> bool {
        self.focused_id.as_ref() == Some(id)
    }

    /// Is `id` the pressed widget?
    pub fn is_pressed(&self, id: &IdPath) -> bool {
        self.pressed_id.as_ref() == Some(id)
    }

    /// Did `id` request focus to move on?
    pub fn has_requested_focus_next(&self, id: &IdPath) -> bool {
        self.focus_next_requested_by.as_ref() == Some(id)
    }

    /// May `id` become active? Only when nothing is active.
    pub fn can_activate(&self, id: &IdPath) -> bool {
        self.active_id.is_none() && !self.is_active(id)
    }

    /// May `id` deactivate? Only when it is the active widget.
    pub fn can_deactivate(&self, id: &IdPath) -> bool {
        self.is_active(id)
    }

    /// Is there an active widget that failed to re-assert aliveness?
    pub fn is_active_id_stale(&self) -> bool {
        match &self.active_id {
            Some(active) => self.active_id_is_alive.as_ref() != Some(active),
            None => false,
        }
    }
}
