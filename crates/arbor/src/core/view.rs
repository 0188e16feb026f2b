//! What a renderer needs to know about a node.

use crate::{
    node::{Node, NodeKind},
    path::IdPath,
    state::{InputBufferState, InteractionState},
};

/// A node's published appearance under a given interaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    /// Node path.
    pub id: IdPath,
    /// Node kind.
    pub kind: NodeKind,
    /// Translated label or text content.
    pub label: Option<String>,
    /// Is this the active widget?
    pub is_active: bool,
    /// Is this the focused widget?
    pub is_focused: bool,
    /// Is this widget under a press?
    pub is_pressed: bool,
    /// Does the node accept interaction?
    pub enabled: bool,
    /// Validity of the displayed value. Only an active input can be invalid.
    pub buffer_state: InputBufferState,
    /// The value to display: the edit buffer while active, the committed value
    /// otherwise. `None` for nodes without a value.
    pub raw_value: Option<String>,
    /// Should the renderer accept typing?
    pub editable: bool,
}

impl WidgetView {
    /// Compute the view of `node`.
    pub fn of(node: &Node, state: &InteractionState) -> Self {
        let id = node.id();
        let is_active = node.is_interactive() && state.is_active(id);
        let is_focused = node.is_interactive() && state.is_focused(id);
        let raw_value = node.value().map(|v| {
            state
                .input_buffer()
                .filter(|_| is_active)
                .unwrap_or(v)
                .to_string()
        });
        Self {
            id: id.clone(),
            kind: node.kind(),
            label: node.label().map(|l| l.translate()),
            is_active,
            is_focused,
            is_pressed: node.is_interactive() && state.is_pressed(id),
            enabled: node.enabled(),
            buffer_state: if is_active {
                state.input_buffer_state()
            } else {
                InputBufferState::Valid
            },
            raw_value,
            editable: node.kind() == NodeKind::Input && is_active && is_focused,
        }
    }
}

/// Render a tree as plain text, one node per line, the way a minimal
/// terminal front end would draw it.
///
/// Buttons render as `[label]`, inputs as `label: value`. A leading `>` marks
/// focus, a trailing `*` marks the active widget, and `!` marks an invalid
/// buffer.
pub fn render(tree: &Node, state: &InteractionState) -> String {
    let mut out = String::new();
    render_node(&mut out, tree, state, 0);
    out
}

/// Render one node and its children.
fn render_node(out: &mut String, node: &Node, state: &InteractionState, level: usize) {
    let view = WidgetView::of(node, state);
    let mark = if view.is_focused { "> " } else { "  " };
    let indent = "  ".repeat(level);
    let label = view.label.unwrap_or_default();
    let line = match view.kind {
        NodeKind::Text => Some(label),
        NodeKind::Button => Some(format!("[{label}]")),
        NodeKind::Input => {
            let value = view.raw_value.unwrap_or_default();
            Some(if label.is_empty() {
                value
            } else {
                format!("{label}: {value}")
            })
        }
        NodeKind::Container | NodeKind::List => None,
    };
    let next_level = match line {
        Some(line) => {
            let active = if view.is_active { " *" } else { "" };
            let invalid = if view.buffer_state == InputBufferState::Invalid {
                " !"
            } else {
                ""
            };
            let disabled = if view.enabled { "" } else { " (disabled)" };
            out.push_str(&format!("{mark}{indent}{line}{active}{invalid}{disabled}\n"));
            level + 1
        }
        None => level,
    };
    for child in node.children() {
        render_node(out, child, state, next_level);
    }
}
