use std::{mem, rc::Rc, time::Duration};

use crate::{
    context::BuildContext,
    dump::{Trajectory, dump_plain},
    error::{Error, Result},
    next::{Next, Transition},
    node::Node,
    publish::{SubscriptionId, Subscriptions},
    state::InteractionState,
    trace::{Clock, Step, SystemClock, TraceEvent, Tracer},
    view::WidgetView,
    widgets::WidgetBuilder,
};

/// Default bound on frames per convergence run.
pub const DEFAULT_ITERATION_CAP: usize = 20;
/// Default number of snapshots kept for non-convergence reports.
pub const DEFAULT_TRAJECTORY_DEPTH: usize = 8;

/// Runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum frames per convergence run before giving up.
    pub iteration_cap: usize,
    /// Snapshots carried by a [`Error::NotConverged`] report.
    pub trajectory_depth: usize,
    /// Collect protocol trace events into each [`Convergence`].
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iteration_cap: DEFAULT_ITERATION_CAP,
            trajectory_depth: DEFAULT_TRAJECTORY_DEPTH,
            trace: false,
        }
    }
}

/// What a convergence run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Convergence {
    /// Frames evaluated.
    pub frames: usize,
    /// Effects run.
    pub effects: usize,
    /// Stale active ids cleared.
    pub stale_recoveries: usize,
    /// Wall time spent, as reported by the runner's clock.
    pub elapsed: Duration,
    /// Recorded protocol steps, empty unless tracing is enabled.
    pub trace: Vec<TraceEvent>,
}

impl Convergence {
    /// Combine the reports of consecutive runs.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.frames += other.frames;
        self.effects += other.effects;
        self.stale_recoveries += other.stale_recoveries;
        self.elapsed += other.elapsed;
        self.trace.extend(other.trace);
        self
    }
}

/// A view function: model in, widget builder out.
type ViewFn<M> = dyn Fn(&M) -> WidgetBuilder<M>;

/// Builder for a [`Runner`].
pub struct RunnerBuilder<M> {
    /// Initial model.
    model: M,
    /// View function.
    view: Rc<ViewFn<M>>,
    /// Configuration.
    config: Config,
    /// Timestamp source for traces and timings.
    clock: Rc<dyn Clock>,
}

impl<M: 'static> RunnerBuilder<M> {
    /// Set the iteration cap.
    pub fn iteration_cap(mut self, cap: usize) -> Self {
        self.config.iteration_cap = cap;
        self
    }

    /// Set the number of snapshots kept for non-convergence reports.
    pub fn trajectory_depth(mut self, depth: usize) -> Self {
        self.config.trajectory_depth = depth;
        self
    }

    /// Record protocol steps in each convergence report.
    pub fn trace(mut self, trace: bool) -> Self {
        self.config.trace = trace;
        self
    }

    /// Replace the clock.
    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the tree and run an initial convergence.
    pub fn build(self) -> Result<Runner<M>> {
        if self.config.iteration_cap == 0 {
            return Err(Error::Invalid("iteration cap must be at least 1".into()));
        }
        let mut runner = Runner {
            model: self.model,
            view: self.view,
            config: self.config,
            clock: self.clock,
            tree: Node::Container {
                id: Default::default(),
                children: vec![],
            },
            transition: Transition::inert(),
            state: InteractionState::new(),
            subscriptions: Subscriptions::default(),
        };
        runner.rebuild();
        runner.dispatch(|s| s)?;
        Ok(runner)
    }
}

/// Owns the application model, the current widget tree and the interaction
/// state, and runs the convergence loop.
///
/// Every externally originated change goes through [`Runner::dispatch`]:
/// the change is applied to the state, the tree is evaluated until it halts,
/// and the result is published. Effects raised while converging run against
/// the model immediately, after which the tree is rebuilt from the updated
/// model so later frames never see stale closures.
pub struct Runner<M> {
    /// The application model.
    model: M,
    /// View function.
    view: Rc<ViewFn<M>>,
    /// Configuration.
    config: Config,
    /// Timestamp source.
    clock: Rc<dyn Clock>,
    /// Published tree.
    tree: Node,
    /// Root transition for the published tree.
    transition: Transition<M>,
    /// Published interaction state.
    state: InteractionState,
    /// View subscriptions.
    subscriptions: Subscriptions,
}

impl<M: 'static> Runner<M> {
    /// Start configuring a runner.
    pub fn builder(model: M, view: impl Fn(&M) -> WidgetBuilder<M> + 'static) -> RunnerBuilder<M> {
        RunnerBuilder {
            model,
            view: Rc::new(view),
            config: Config::default(),
            clock: Rc::new(SystemClock),
        }
    }

    /// A runner with default configuration.
    pub fn new(model: M, view: impl Fn(&M) -> WidgetBuilder<M> + 'static) -> Result<Self> {
        Self::builder(model, view).build()
    }

    /// The published tree.
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// The published interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The application model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Configuration.
    pub fn config(&self) -> Config {
        self.config
    }

    /// The view of the node at `route`, if present.
    pub fn view_of(&self, route: &str) -> Option<WidgetView> {
        self.tree
            .find(&route.into())
            .map(|n| WidgetView::of(n, &self.state))
    }

    /// An outline of the published tree with interaction markers.
    pub fn dump(&self) -> String {
        dump_plain(&self.tree, &self.state)
    }

    /// Apply `f` to the state, converge and publish.
    ///
    /// If the loop fails to converge the published state is left as it was.
    /// Effects that ran before the failure are not rolled back, and the tree
    /// rebuilt after them is still published.
    pub fn dispatch(
        &mut self,
        f: impl FnOnce(InteractionState) -> InteractionState,
    ) -> Result<Convergence> {
        let start = f(self.state.clone());
        let result = self.converge(start);
        if let Ok((state, _)) = &result {
            self.state = state.clone();
        }
        self.publish();
        result.map(|(_, report)| report)
    }

    /// Apply `f` to the published state without converging. Used for edits
    /// that only touch the input buffer.
    pub fn update(&mut self, f: impl FnOnce(InteractionState) -> InteractionState) {
        let state = mem::take(&mut self.state);
        self.state = f(state);
        self.publish();
    }

    /// Change the model from outside the widget tree, then rebuild. No
    /// convergence runs until the next dispatch.
    pub fn update_model(&mut self, f: impl FnOnce(&mut M)) {
        f(&mut self.model);
        self.rebuild();
        self.publish();
    }

    /// Watch nodes whose paths match `pattern`. The callback receives the
    /// node's view on every publish where it changed, starting with the
    /// current one.
    pub fn subscribe(
        &mut self,
        pattern: &str,
        callback: impl FnMut(&WidgetView) + 'static,
    ) -> Result<SubscriptionId> {
        let id = self.subscriptions.add(pattern, callback)?;
        self.publish();
        Ok(id)
    }

    /// Remove a subscription. Returns false if it did not exist.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(id)
    }

    /// Rebuild the tree from the model.
    fn rebuild(&mut self) {
        let start = self.clock.now();
        let widget = (self.view)(&self.model).build(&BuildContext::root());
        self.tree = widget.ui;
        self.transition = widget.transition;
        tracing::debug!(
            elapsed = ?self.clock.now().saturating_duration_since(start),
            "rebuilt widget tree"
        );
    }

    /// Notify subscribers of the current tree and state.
    fn publish(&mut self) {
        self.subscriptions.notify(&self.tree, &self.state);
    }

    /// Evaluate the tree from `previous` until it halts with no stale active id.
    fn converge(&mut self, previous: InteractionState) -> Result<(InteractionState, Convergence)> {
        let mut tracer = Tracer::new(self.clock.clone(), self.config.trace);
        let mut trajectory = Trajectory::with_depth(self.config.trajectory_depth);
        let mut report = Convergence::default();
        let mut state = previous.new_frame();
        let mut keep_alive = true;

        while keep_alive {
            trajectory.push(state.clone());
            match self.transition.step(&state, &mut tracer) {
                Next::Continue(next) => state = next,
                Next::SuspendAndResume(effect) => {
                    tracer.record_loop(Step::Effect(effect.name().to_string()));
                    state = effect.run(&mut self.model);
                    report.effects += 1;
                    self.rebuild();
                    tracer.record_loop(Step::Rebuilt);
                }
                Next::Halt => keep_alive = false,
            }
            report.frames += 1;

            if keep_alive && report.frames >= self.config.iteration_cap {
                trajectory.push(state);
                tracing::error!(
                    frames = report.frames,
                    "convergence failed, recent states:\n{trajectory}"
                );
                return Err(Error::NotConverged {
                    frames: report.frames,
                    trajectory,
                });
            }

            if !keep_alive && state.is_active_id_stale() {
                tracer.record_loop(Step::StaleCleared);
                tracing::debug!(active = ?state.active_id(), "clearing stale active id");
                state = state.set_active_id(None);
                report.stale_recoveries += 1;
                keep_alive = true;
            }
        }

        report.elapsed = tracer.elapsed();
        tracing::debug!(
            frames = report.frames,
            effects = report.effects,
            elapsed = ?report.elapsed,
            "converged"
        );
        report.trace = tracer.into_events();
        Ok((state, report))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        path::IdPath,
        state::InputBufferState,
        trace::FrozenClock,
        widgets::{Widget, button, container, integer, text},
    };

    fn counters(model: &Vec<i64>) -> WidgetBuilder<Vec<i64>> {
        container(
            model
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    integer(*v, move |m: &mut Vec<i64>, n| m[i] = n).id(format!("n{i}"))
                })
                .collect(),
        )
    }

    #[test]
    fn initial_build_converges() -> Result<()> {
        let r = Runner::new(vec![1, 2], counters)?;
        assert_eq!(r.tree().children().len(), 2);
        assert_eq!(r.state(), &InteractionState::new());
        assert_eq!(r.config(), Config::default());
        Ok(())
    }

    #[test]
    fn zero_cap_is_invalid() {
        let r = Runner::builder(vec![1], counters).iteration_cap(0).build();
        assert!(matches!(r, Err(Error::Invalid(_))));
    }

    #[test]
    fn focus_activates_and_blur_commits() -> Result<()> {
        let mut r = Runner::new(vec![3], counters)?;
        let n = IdPath::from("/n0");

        let c = r.dispatch(|s| s.set_focused_id(Some(n.clone())))?;
        assert!(r.state().is_active(&n));
        assert_eq!(c.effects, 0);

        r.update(|s| s.set_input_buffer(Some("35".into())));
        r.dispatch(|s| s)?;
        assert_eq!(r.model(), &vec![3]);

        let c = r.dispatch(|s| s.set_focused_id(None))?;
        assert_eq!(c.effects, 1);
        assert_eq!(r.model(), &vec![35]);
        assert!(r.state().active_id().is_none());
        assert_eq!(r.tree().find(&n).and_then(Node::value), Some("35"));
        Ok(())
    }

    #[test]
    fn trace_is_recorded_on_request() -> Result<()> {
        let mut r = Runner::builder(0u32, |_: &u32| button(|m: &mut u32| *m += 1).id("b"))
            .trace(true)
            .clock(Rc::new(FrozenClock::new()))
            .build()?;
        let c = r.dispatch(|s| s.set_pressed_id(Some(IdPath::from("/b"))))?;
        assert_eq!(r.model(), &1);
        assert_eq!(c.elapsed, Duration::ZERO);
        let steps: Vec<&Step> = c.trace.iter().map(|e| &e.step).collect();
        assert_eq!(
            steps,
            vec![
                &Step::Activating,
                &Step::Effect("press b".into()),
                &Step::Rebuilt,
            ]
        );
        Ok(())
    }

    /// A view that spins forever once the model flag is set.
    fn spinner(spin: &bool) -> WidgetBuilder<bool> {
        if !*spin {
            return text("idle");
        }
        WidgetBuilder::new(|_| Widget {
            ui: Node::Text {
                id: IdPath::root(),
                text: "spin".into(),
            },
            transition: Transition::new(|s: &InteractionState, _: &mut Tracer| {
                Next::Continue(s.clone().set_auto_focus(!s.auto_focus()))
            }),
        })
    }

    #[test]
    fn runaway_transitions_fail() -> Result<()> {
        let mut r = Runner::builder(false, spinner)
            .iteration_cap(5)
            .trajectory_depth(3)
            .build()?;
        let before = r.state().clone();
        r.update_model(|spin| *spin = true);

        match r.dispatch(|s| s.set_focused_id(Some(IdPath::from("/x")))) {
            Err(Error::NotConverged { frames, trajectory }) => {
                assert_eq!(frames, 5);
                assert_eq!(trajectory.len(), 3);
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected non-convergence"),
        }
        assert_eq!(r.state(), &before);

        let built = Runner::builder(true, spinner).iteration_cap(5).build();
        assert!(matches!(built, Err(Error::NotConverged { .. })));
        Ok(())
    }

    /// A button that reveals a widget flipping buffer validity forever.
    fn trap(armed: &bool) -> WidgetBuilder<bool> {
        let mut children = vec![button(|m: &mut bool| *m = true).id("go")];
        if *armed {
            children.push(
                WidgetBuilder::new(|ctx| Widget {
                    ui: Node::Text {
                        id: ctx.current_path().clone(),
                        text: "flicker".into(),
                    },
                    transition: Transition::new(|s: &InteractionState, _: &mut Tracer| {
                        let next = match s.input_buffer_state() {
                            InputBufferState::Valid => InputBufferState::Invalid,
                            InputBufferState::Invalid => InputBufferState::Valid,
                        };
                        Next::Continue(s.clone().set_input_buffer_state(next))
                    }),
                })
                .id("flicker"),
            );
        }
        container(children)
    }

    #[test]
    fn failed_dispatch_publishes_the_rebuilt_tree() -> Result<()> {
        let seen = Rc::new(RefCell::new(0));
        let log = seen.clone();
        let mut r = Runner::builder(false, trap).iteration_cap(5).build()?;
        r.subscribe("/flicker", move |_| *log.borrow_mut() += 1)?;
        assert_eq!(*seen.borrow(), 0);

        let before = r.state().clone();
        let go = IdPath::from("/go");
        let res = r.dispatch(|s| {
            s.set_focused_id(Some(go.clone()))
                .set_pressed_id(Some(go.clone()))
        });
        assert!(matches!(res, Err(Error::NotConverged { .. })));
        assert!(*r.model());
        assert_eq!(r.state(), &before);
        assert!(r.tree().find(&IdPath::from("/flicker")).is_some());
        assert_eq!(*seen.borrow(), 1);
        Ok(())
    }

    #[test]
    fn update_model_rebuilds_without_converging() -> Result<()> {
        let mut r = Runner::new(vec![1, 2, 3], counters)?;
        r.update_model(|m| m.truncate(1));
        assert_eq!(r.tree().children().len(), 1);
        Ok(())
    }

    #[test]
    fn subscriptions_see_changes() -> Result<()> {
        let seen = Rc::new(RefCell::new(vec![]));
        let log = seen.clone();
        let mut r = Runner::new(vec![1, 2], counters)?;
        let id = r.subscribe("/n1", move |v| log.borrow_mut().push(v.is_focused))?;
        r.dispatch(|s| s.set_focused_id(Some(IdPath::from("/n0"))))?;
        r.dispatch(|s| s.set_focused_id(Some(IdPath::from("/n1"))))?;
        assert_eq!(*seen.borrow(), vec![false, true]);
        assert!(r.unsubscribe(id));
        assert!(!r.unsubscribe(id));
        Ok(())
    }
}
