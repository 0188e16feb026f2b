//! Per-run tracing of the interaction protocol.
//!
//! A [`Tracer`] is created for a single convergence run and handed to every
//! transition function it evaluates. Steps are always emitted as `tracing`
//! events; when recording is enabled they are also collected so callers can
//! inspect exactly what the protocol did.

use std::{
    rc::Rc,
    time::{Duration, Instant},
};

use crate::path::IdPath;

/// Source of timestamps for a tracer.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that never advances, for deterministic traces in tests.
#[derive(Debug, Clone, Copy)]
pub struct FrozenClock {
    /// The instant reported on every call.
    at: Instant,
}

impl FrozenClock {
    /// Freeze the clock at the current instant.
    pub fn new() -> Self {
        Self { at: Instant::now() }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> Instant {
        self.at
    }
}

/// A protocol or loop step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A widget consumed its own focus-next request.
    FocusNextClaimed,
    /// A widget claimed pending autofocus.
    AutoFocusClaimed,
    /// The active widget asked to deactivate.
    Deactivating,
    /// The active widget wanted to deactivate but declined to release.
    DeactivationDeclined,
    /// The active widget re-asserted aliveness.
    KeepAlive,
    /// A widget became active.
    Activating,
    /// The loop ran an effect.
    Effect(String),
    /// The loop rebuilt the widget tree.
    Rebuilt,
    /// The loop cleared a stale active id.
    StaleCleared,
}

/// A recorded step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Time since the run started.
    pub at: Duration,
    /// Widget the step concerns, if any.
    pub path: Option<IdPath>,
    /// What happened.
    pub step: Step,
}

/// Tracer scoped to one convergence run.
pub struct Tracer {
    /// Timestamp source.
    clock: Rc<dyn Clock>,
    /// Start of the run.
    started: Instant,
    /// Whether to keep events.
    recording: bool,
    /// Collected events.
    events: Vec<TraceEvent>,
}

impl Tracer {
    /// Start a tracer at the clock's current instant.
    pub fn new(clock: Rc<dyn Clock>, recording: bool) -> Self {
        let started = clock.now();
        Self {
            clock,
            started,
            recording,
            events: vec![],
        }
    }

    /// A wall-clock tracer that does not record.
    pub fn discard() -> Self {
        Self::new(Rc::new(SystemClock), false)
    }

    /// A wall-clock tracer that records.
    pub fn recording() -> Self {
        Self::new(Rc::new(SystemClock), true)
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.started)
    }

    /// Record a step for a widget.
    pub fn record(&mut self, path: &IdPath, step: Step) {
        tracing::trace!(path = %path, step = ?step, "protocol");
        self.push(Some(path.clone()), step);
    }

    /// Record a loop-level step.
    pub fn record_loop(&mut self, step: Step) {
        tracing::debug!(step = ?step, "convergence");
        self.push(None, step);
    }

    /// Store an event when recording.
    fn push(&mut self, path: Option<IdPath>, step: Step) {
        if self.recording {
            let at = self.elapsed();
            self.events.push(TraceEvent { at, path, step });
        }
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Consume the tracer, returning its events.
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}
