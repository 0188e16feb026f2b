//! A line-oriented command language for driving a [`Runner`] without a
//! terminal front end.
//!
//! One command per line. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! focus /inputs/div0/name0
//! type /inputs/div0/name0 35
//! blur /inputs/div0/name0
//! press /inputs/test
//! tab /inputs/div1/name1
//! dispatch
//! render
//! tree
//! state
//! quit
//! ```
//!
//! The text argument of `type` is the rest of the line. Wrap it in double
//! quotes to keep surrounding whitespace or to type an empty string.

use std::io::{self, Write};

use arbor::{
    Convergence, Runner,
    dump::{dump, dump_plain, state_table},
    error::{self, ParseError},
    gesture::Gesture,
    path::IdPath,
    trace::TraceEvent,
    view::render,
};

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Deliver a gesture.
    Gesture(Gesture),
    /// Settle the current state without changing it.
    Dispatch,
    /// Print the rendered screen.
    Render,
    /// Print the annotated tree.
    Tree,
    /// Print the interaction state.
    State,
    /// Stop reading commands.
    Quit,
}

/// What the driver should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Stop.
    Quit,
}

/// Output options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Colour the tree dump.
    pub color: bool,
    /// Print recorded protocol steps after each convergence run.
    pub trace: bool,
}

/// Parse one line. `line` is the 1-based line number used in errors.
pub fn parse_line(text: &str, line: usize) -> error::Result<Option<Command>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let indent = text.len() - text.trim_start().len();
    let (word, rest) = split_word(trimmed);
    let rest_offset = indent + (trimmed.len() - rest.len());
    let err = |msg: String, offset: usize| ParseError::with_position(msg, Some(line), Some(offset));

    let bare = |cmd: Command| {
        if rest.is_empty() {
            Ok(Some(cmd))
        } else {
            Err(err(format!("{word} takes no arguments"), rest_offset))
        }
    };
    let command = match word {
        "dispatch" => return Ok(bare(Command::Dispatch)?),
        "render" => return Ok(bare(Command::Render)?),
        "tree" => return Ok(bare(Command::Tree)?),
        "state" => return Ok(bare(Command::State)?),
        "quit" => return Ok(bare(Command::Quit)?),
        "focus" | "blur" | "press" | "tab" | "type" => word,
        other => return Err(err(format!("unknown command {other:?}"), indent).into()),
    };

    let (route, tail) = split_word(rest);
    if !route.starts_with('/') {
        return Err(err(format!("{command} needs a route starting with '/'"), rest_offset).into());
    }
    let id = IdPath::from(route);
    let tail_offset = rest_offset + (rest.len() - tail.len());
    let gesture = match command {
        "type" => Gesture::ChangeText(id, unquote(tail).map_err(|m| err(m, tail_offset))?),
        _ if !tail.is_empty() => {
            return Err(err(format!("{command} takes a single route"), tail_offset).into());
        }
        "focus" => Gesture::Focus(id),
        "blur" => Gesture::Blur(id),
        "press" => Gesture::Press(id),
        _ => Gesture::TabNext(id),
    };
    Ok(Some(Command::Gesture(gesture)))
}

/// Parse a whole script. Fails on the first bad line.
pub fn parse(script: &str) -> error::Result<Vec<Command>> {
    let mut commands = vec![];
    for (i, line) in script.lines().enumerate() {
        if let Some(cmd) = parse_line(line, i + 1)? {
            commands.push(cmd);
        }
    }
    Ok(commands)
}

/// Split off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

/// Strip optional surrounding double quotes.
fn unquote(s: &str) -> Result<String, String> {
    match s.strip_prefix('"') {
        None => Ok(s.trim_end().to_string()),
        Some(inner) => inner
            .trim_end()
            .strip_suffix('"')
            .map(str::to_string)
            .ok_or_else(|| "unterminated quote".to_string()),
    }
}

/// Run one command against `runner`, writing any output to `out`.
pub fn execute<M: 'static>(
    runner: &mut Runner<M>,
    command: &Command,
    output: Output,
    out: &mut dyn Write,
) -> anyhow::Result<Flow> {
    match command {
        Command::Gesture(g) => {
            if let Some(report) = g.apply(runner)? {
                write_report(out, g, &report, output.trace)?;
            }
        }
        Command::Dispatch => {
            let report = runner.dispatch(|s| s)?;
            writeln!(
                out,
                "dispatch: {} frames, {} effects",
                report.frames, report.effects
            )?;
            if output.trace {
                write_trace(out, &report.trace)?;
            }
        }
        Command::Render => write!(out, "{}", render(runner.tree(), runner.state()))?,
        Command::Tree => {
            let text = if output.color {
                dump(runner.tree(), runner.state())
            } else {
                dump_plain(runner.tree(), runner.state())
            };
            write!(out, "{text}")?;
        }
        Command::State => writeln!(out, "{}", state_table([runner.state()]))?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Summarise a convergence run.
fn write_report(
    out: &mut dyn Write,
    gesture: &Gesture,
    report: &Convergence,
    trace: bool,
) -> io::Result<()> {
    writeln!(
        out,
        "{gesture}: {} frames, {} effects",
        report.frames, report.effects
    )?;
    if report.stale_recoveries > 0 {
        writeln!(out, "  cleared {} stale activations", report.stale_recoveries)?;
    }
    if trace {
        write_trace(out, &report.trace)?;
    }
    Ok(())
}

/// Print recorded protocol steps.
fn write_trace(out: &mut dyn Write, events: &[TraceEvent]) -> io::Result<()> {
    for e in events {
        let path = e.path.as_ref().map_or_else(|| "-".to_string(), IdPath::route);
        writeln!(out, "  {:>8.3?} {path} {:?}", e.at, e.step)?;
    }
    Ok(())
}
