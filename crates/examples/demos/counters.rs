//! Drive the counters form from a script or from standard input.
//!
//! ```text
//! cargo run --example counters -- --script session.txt -vv
//! ```

use std::{
    fs,
    io::{self, BufRead, IsTerminal, Write},
    panic,
    path::PathBuf,
};

use anyhow::{Context, Result};
use arbor::{Runner, error::Error, runner::DEFAULT_ITERATION_CAP};
use arbor_examples::{
    counters::{COUNTERS, Counters, view},
    script::{Command, Flow, Output, execute, parse, parse_line},
};
use clap::{ArgAction, Parser};
use color_backtrace::{BacktracePrinter, default_output_stream};
use tracing::Level;
use tracing_subscriber::fmt;

/// Command line options.
#[derive(Parser, Debug)]
#[command(author, version, about = "Counters form driven by line commands")]
struct Args {
    /// Read commands from a file instead of standard input.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Increase log verbosity. Repeat for more.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print recorded protocol steps after each run.
    #[arg(long)]
    trace: bool,

    /// Frames allowed per convergence run.
    #[arg(long, default_value_t = DEFAULT_ITERATION_CAP)]
    iteration_cap: usize,

    /// Number of counters in the form.
    #[arg(long, default_value_t = COUNTERS)]
    counters: usize,
}

/// Log to stderr at a level chosen by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let format = fmt::format()
        .with_level(true)
        .with_line_number(true)
        .without_time()
        .compact();
    fmt()
        .event_format(format)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Print panics with coloured backtraces.
fn install_panic_hook() {
    panic::set_hook(Box::new(|pi| {
        if BacktracePrinter::new()
            .print_panic_info(pi, &mut default_output_stream())
            .is_err()
        {
            eprintln!("{pi}");
        }
    }));
}

/// Entry point.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    install_panic_hook();

    let mut runner = Runner::builder(Counters::new(args.counters), view)
        .iteration_cap(args.iteration_cap)
        .trace(args.trace)
        .build()?;
    let stdout = io::stdout();
    let output = Output {
        color: stdout.is_terminal(),
        trace: args.trace,
    };
    let mut out = stdout.lock();

    if let Some(path) = &args.script {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        for command in parse(&text)? {
            if execute(&mut runner, &command, output, &mut out)? == Flow::Quit {
                break;
            }
        }
    } else {
        // Interactive: report bad lines and keep going.
        execute(&mut runner, &Command::Render, output, &mut out)?;
        for (i, line) in io::stdin().lock().lines().enumerate() {
            let line = line?;
            let command = match parse_line(&line, i + 1) {
                Ok(Some(c)) => c,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "{e}")?;
                    continue;
                }
            };
            match execute(&mut runner, &command, output, &mut out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => match e.downcast_ref::<Error>() {
                    Some(Error::NotFound(_)) => writeln!(out, "{e}")?,
                    _ => return Err(e),
                },
            }
            if matches!(command, Command::Gesture(_)) {
                execute(&mut runner, &Command::Render, output, &mut out)?;
            }
        }
    }
    out.flush()?;
    tracing::info!(model = ?runner.model(), "done");
    Ok(())
}
