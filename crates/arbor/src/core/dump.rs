use std::{
    collections::VecDeque,
    fmt,
    io::{self, Write},
};

use comfy_table::{Cell, Color as CellColor, ContentArrangement, Table, presets::UTF8_FULL};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{node::Node, path::IdPath, state::InteractionState};

/// The most recent snapshots of a convergence run, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    /// Maximum number of snapshots kept.
    depth: usize,
    /// Retained snapshots.
    states: VecDeque<InteractionState>,
}

impl Trajectory {
    /// An empty trajectory keeping at most `depth` snapshots.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            states: VecDeque::with_capacity(depth),
        }
    }

    /// Append a snapshot, evicting the oldest when full.
    pub fn push(&mut self, state: InteractionState) {
        if self.depth == 0 {
            return;
        }
        if self.states.len() == self.depth {
            self.states.pop_front();
        }
        self.states.push_back(state);
    }

    /// Retained snapshots, oldest first.
    pub fn states(&self) -> impl Iterator<Item = &InteractionState> {
        self.states.iter()
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Is the trajectory empty?
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Format an optional path for a table cell.
fn cell_path(p: Option<&IdPath>) -> Cell {
    match p {
        Some(p) => Cell::new(p.route()).fg(CellColor::Green),
        None => Cell::new("-"),
    }
}

/// Render snapshots as a table, one row per snapshot.
pub fn state_table<'a>(states: impl IntoIterator<Item = &'a InteractionState>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "#", "active", "alive", "pressed", "focused", "focus next", "auto", "buffer", "validity",
    ]);
    for (i, s) in states.into_iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            cell_path(s.active_id()),
            cell_path(s.active_id_is_alive()),
            cell_path(s.pressed_id()),
            cell_path(s.focused_id()),
            cell_path(s.focus_next_requested_by()),
            Cell::new(s.auto_focus()),
            Cell::new(s.input_buffer().map_or_else(|| "-".into(), |b| format!("{b:?}"))),
            Cell::new(s.input_buffer_state()),
        ]);
    }
    table
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", state_table(self.states()))
    }
}

/// Traverses a widget tree and returns an indented, colored outline with
/// interaction indicators for each node. This is a debug function.
pub fn dump(tree: &Node, state: &InteractionState) -> String {
    let mut buffer = Buffer::ansi();
    render(&mut buffer, tree, state)
}

/// As [`dump`], without color codes.
pub fn dump_plain(tree: &Node, state: &InteractionState) -> String {
    let mut buffer = Buffer::no_color();
    render(&mut buffer, tree, state)
}

/// Fill `buffer` and return its contents.
fn render(buffer: &mut Buffer, tree: &Node, state: &InteractionState) -> String {
    match dump_node(buffer, tree, state, 0) {
        Ok(()) => String::from_utf8_lossy(buffer.as_slice()).into_owned(),
        Err(e) => format!("dump failed: {e}"),
    }
}

/// Walk a node subtree and emit formatted debug output.
fn dump_node(
    buffer: &mut Buffer,
    node: &Node,
    state: &InteractionState,
    level: usize,
) -> io::Result<()> {
    let indent = "    ".repeat(level);
    write!(buffer, "{indent}")?;

    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", node.kind())?;
    buffer.reset()?;
    write!(buffer, " {}", node.id().route())?;
    if let Some(label) = node.label() {
        write!(buffer, " {:?}", label.translate())?;
    }

    let id = node.id();
    let mut indicators = Vec::new();
    if node.is_interactive() {
        if state.is_active(id) {
            indicators.push(("ACTIVE", Color::Red));
        }
        if state.is_focused(id) {
            indicators.push(("FOCUSED", Color::Magenta));
        }
        if state.is_pressed(id) {
            indicators.push(("pressed", Color::Blue));
        }
        if !node.enabled() {
            indicators.push(("disabled", Color::Yellow));
        }
    }
    for (i, (indicator, color)) in indicators.iter().enumerate() {
        write!(buffer, "{}", if i == 0 { " " } else { ", " })?;
        buffer.set_color(ColorSpec::new().set_fg(Some(*color)))?;
        write!(buffer, "{indicator}")?;
        buffer.reset()?;
    }
    writeln!(buffer)?;

    if let Some(value) = node.value() {
        write!(buffer, "{indent}  ")?;
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(buffer, "value:")?;
        buffer.reset()?;
        writeln!(buffer, " {value:?}")?;
        if state.is_active(id)
            && let Some(b) = state.input_buffer()
        {
            write!(buffer, "{indent}  ")?;
            buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(buffer, "buffer:")?;
            buffer.reset()?;
            writeln!(buffer, " {b:?} ({})", state.input_buffer_state())?;
        }
    }

    for child in node.children() {
        dump_node(buffer, child, state, level + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trajectory_is_bounded() {
        let mut t = Trajectory::with_depth(2);
        for name in ["/a", "/b", "/c"] {
            t.push(InteractionState::new().set_focused_id(Some(IdPath::from(name))));
        }
        let focused: Vec<String> = t
            .states()
            .filter_map(|s| s.focused_id().map(IdPath::route))
            .collect();
        assert_eq!(focused, vec!["/b", "/c"]);

        let rendered = t.to_string();
        assert!(rendered.contains("/c"));
        assert!(!rendered.contains("/a"));

        let mut empty = Trajectory::with_depth(0);
        empty.push(InteractionState::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn dump_marks_interaction() {
        let tree = Node::Container {
            id: IdPath::root(),
            children: vec![
                Node::Input {
                    id: IdPath::from("/n"),
                    label: None,
                    value: "3".into(),
                    enabled: true,
                },
                Node::Button {
                    id: IdPath::from("/b"),
                    label: "Go".into(),
                    enabled: false,
                },
            ],
        };
        let state = InteractionState::new()
            .set_active_id(Some(IdPath::from("/n")))
            .set_focused_id(Some(IdPath::from("/n")))
            .set_input_buffer(Some("35".into()));
        let out = dump_plain(&tree, &state);
        assert_eq!(
            out,
            "container /\n    input /n ACTIVE, FOCUSED\n      value: \"3\"\n      buffer: \"35\" (valid)\n    button /b \"Go\" disabled\n"
        );
        assert!(dump(&tree, &state).contains("\u{1b}["));
    }
}
