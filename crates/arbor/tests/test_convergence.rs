//! Integration tests for the convergence loop.

#[cfg(test)]
mod tests {
    use arbor::{
        Runner,
        error::{Error, Result},
        gesture::Gesture,
        next::{Next, Transition},
        node::Node,
        path::IdPath,
        state::{InputBufferState, InteractionState},
        tr,
        trace::Tracer,
        widgets::{Widget, WidgetBuilder, button, container, integer, list, text},
    };
    use pretty_assertions::assert_eq;

    /// A row of integer counters and a save button counting its presses.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Counters {
        values: Vec<i64>,
        saves: u32,
    }

    fn counters(n: usize) -> Counters {
        Counters {
            values: (0..n as i64).collect(),
            saves: 0,
        }
    }

    fn view(model: &Counters) -> WidgetBuilder<Counters> {
        let mut rows: Vec<_> = model
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                integer(*v, move |m: &mut Counters, n| {
                    if let Some(slot) = m.values.get_mut(i) {
                        *slot = n;
                    }
                })
                .label(tr!("Counter {}", i))
                .id(format!("n{i}"))
            })
            .collect();
        rows.push(
            button(|m: &mut Counters| m.saves += 1)
                .label(tr!("Salva"))
                .id("save"),
        );
        container(rows).id("inputs")
    }

    fn apply<M: 'static>(r: &mut Runner<M>, g: Gesture) -> Result<Option<arbor::Convergence>> {
        g.apply(r)
    }

    fn route(r: &Runner<Counters>, f: fn(&InteractionState) -> Option<&IdPath>) -> Option<String> {
        f(r.state()).map(IdPath::route)
    }

    #[test]
    fn button_fires_once_per_press() -> Result<()> {
        let mut r = Runner::new(counters(2), view)?;
        let c = apply(&mut r, Gesture::Press("/inputs/save".into()))?;
        assert_eq!(r.model().saves, 1);
        assert_eq!(c.map(|c| c.effects), Some(1));
        assert_eq!(
            route(&r, InteractionState::focused_id).as_deref(),
            Some("/inputs/save")
        );
        assert!(r.state().active_id().is_none());

        // Settling again never re-fires.
        r.dispatch(|s| s)?;
        assert_eq!(r.model().saves, 1);

        apply(&mut r, Gesture::Press("/inputs/save".into()))?;
        assert_eq!(r.model().saves, 2);
        Ok(())
    }

    #[test]
    fn integer_edit_commits_on_blur() -> Result<()> {
        let mut r = Runner::new(counters(1), view)?;
        let n0 = "/inputs/n0";
        r.update_model(|m| m.values[0] = 3);

        apply(&mut r, Gesture::Focus(n0.into()))?;
        assert_eq!(route(&r, InteractionState::active_id).as_deref(), Some(n0));
        apply(&mut r, Gesture::ChangeText(n0.into(), "35".into()))?;

        // Dispatching while still focused changes nothing.
        let c = r.dispatch(|s| s)?;
        assert_eq!(c.effects, 0);
        assert_eq!(r.model().values, vec![3]);
        let v = r.view_of(n0).expect("input view");
        assert_eq!(v.raw_value.as_deref(), Some("35"));
        assert_eq!(v.buffer_state, InputBufferState::Valid);
        assert!(v.editable);

        let c = apply(&mut r, Gesture::Blur(n0.into()))?;
        assert_eq!(c.map(|c| c.effects), Some(1));
        assert_eq!(r.model().values, vec![35]);
        assert!(r.state().input_buffer().is_none());
        assert!(r.state().active_id().is_none());
        assert_eq!(r.view_of(n0).and_then(|v| v.raw_value).as_deref(), Some("35"));
        Ok(())
    }

    #[test]
    fn invalid_edits_stay_active() -> Result<()> {
        let mut r = Runner::new(counters(2), view)?;
        let n0 = "/inputs/n0";
        apply(&mut r, Gesture::Focus(n0.into()))?;
        apply(&mut r, Gesture::ChangeText(n0.into(), "3x".into()))?;
        apply(&mut r, Gesture::Focus("/inputs/n1".into()))?;

        assert_eq!(r.model().values, vec![0, 1]);
        assert_eq!(route(&r, InteractionState::active_id).as_deref(), Some(n0));
        let v = r.view_of(n0).expect("input view");
        assert_eq!(v.buffer_state, InputBufferState::Invalid);
        assert!(!v.editable);

        // Fixing the buffer lets the edit through and releases activation.
        apply(&mut r, Gesture::Focus(n0.into()))?;
        apply(&mut r, Gesture::ChangeText(n0.into(), "7".into()))?;
        apply(&mut r, Gesture::Focus("/inputs/n1".into()))?;
        assert_eq!(r.model().values, vec![7, 1]);
        assert_eq!(
            route(&r, InteractionState::active_id).as_deref(),
            Some("/inputs/n1")
        );
        Ok(())
    }

    #[test]
    fn focus_next_chain_visits_every_input() -> Result<()> {
        let mut r = Runner::new(counters(20), view)?;
        apply(&mut r, Gesture::Focus("/inputs/n0".into()))?;
        for i in 0..20 {
            let here = format!("/inputs/n{i}");
            assert_eq!(route(&r, InteractionState::focused_id), Some(here.clone()));
            assert_eq!(route(&r, InteractionState::active_id), Some(here.clone()));
            let c = apply(&mut r, Gesture::TabNext(here.as_str().into()))?;
            assert!(c.is_some_and(|c| c.frames < r.config().iteration_cap));
        }
        // Tabbing out of the last input lands on the save button.
        assert_eq!(
            route(&r, InteractionState::focused_id).as_deref(),
            Some("/inputs/save")
        );
        Ok(())
    }

    #[test]
    fn tab_from_unfocused_widget_is_ignored() -> Result<()> {
        let mut r = Runner::new(counters(2), view)?;
        assert!(apply(&mut r, Gesture::TabNext("/inputs/n0".into()))?.is_none());
        assert!(r.state().focused_id().is_none());
        Ok(())
    }

    #[test]
    fn removed_active_widget_is_cleared() -> Result<()> {
        let mut r = Runner::new(counters(3), view)?;
        apply(&mut r, Gesture::Focus("/inputs/n2".into()))?;
        assert!(r.state().active_id().is_some());

        r.update_model(|m| m.values.truncate(2));
        assert!(r.tree().find(&IdPath::from("/inputs/n2")).is_none());

        let c = r.dispatch(|s| s)?;
        assert!(c.frames <= 2, "took {} frames", c.frames);
        assert_eq!(c.stale_recoveries, 1);
        assert!(r.state().active_id().is_none());
        // Focus is left for ordinary logic to repair.
        assert_eq!(
            route(&r, InteractionState::focused_id).as_deref(),
            Some("/inputs/n2")
        );
        Ok(())
    }

    #[test]
    fn gestures_need_existing_targets() -> Result<()> {
        let mut r = Runner::new(counters(1), view)?;
        let err = apply(&mut r, Gesture::Focus("/inputs/n9".into()));
        assert_eq!(err.err(), Some(Error::NotFound("/inputs/n9".into())));
        Ok(())
    }

    #[test]
    fn disabled_scopes_never_activate() -> Result<()> {
        let mut r = Runner::new((), |_: &()| {
            container(vec![
                integer(1, |_: &mut (), _| {}).id("off").enabled(false),
                integer(2, |_: &mut (), _| {}).id("on"),
            ])
        })?;
        apply(&mut r, Gesture::Focus("/off".into()))?;
        assert!(r.state().active_id().is_none());
        assert!(!r.view_of("/off").is_some_and(|v| v.enabled));

        // Tabbing out of a disabled widget still moves focus on.
        apply(&mut r, Gesture::TabNext("/off".into()))?;
        assert_eq!(r.state().active_id(), Some(&IdPath::from("/on")));
        Ok(())
    }

    #[test]
    fn disabling_the_active_widget_clears_it() -> Result<()> {
        let mut r = Runner::new(true, |on: &bool| {
            container(vec![integer(1, |_: &mut bool, _| {}).id("n").enabled(*on)])
        })?;
        apply(&mut r, Gesture::Focus("/n".into()))?;
        assert_eq!(r.state().active_id(), Some(&IdPath::from("/n")));

        r.update_model(|on| *on = false);
        let c = r.dispatch(|s| s)?;
        assert_eq!(c.stale_recoveries, 1);
        assert!(r.state().active_id().is_none());
        assert!(!r.state().is_active_id_stale());
        Ok(())
    }

    #[test]
    fn static_trees_are_inert() -> Result<()> {
        let r = Runner::new((), |_: &()| {
            list(
                ["a", "b"]
                    .into_iter()
                    .map(|s| container(vec![text(tr!("Test {}", s))]).id(s))
                    .collect(),
            )
            .id("list")
        })?;
        assert_eq!(
            r.tree().to_string(),
            "list /list\n  container /list/a\n    text /list/a \"Test a\"\n  container /list/b\n    text /list/b \"Test b\"\n"
        );
        Ok(())
    }

    /// A widget whose transition toggles autofocus forever.
    fn spinner() -> WidgetBuilder<()> {
        WidgetBuilder::new(|ctx| Widget {
            ui: Node::Text {
                id: ctx.current_path().clone(),
                text: tr!("spin"),
            },
            transition: Transition::new(|s: &InteractionState, _: &mut Tracer| {
                Next::Continue(s.clone().set_auto_focus(!s.auto_focus()))
            }),
        })
    }

    #[test]
    fn non_convergence_reports_trajectory() {
        let built = Runner::builder((), |_: &()| spinner())
            .trajectory_depth(4)
            .build();
        match built {
            Err(Error::NotConverged { frames, trajectory }) => {
                assert_eq!(frames, 20);
                assert_eq!(trajectory.len(), 4);
                let autos: Vec<bool> = trajectory.states().map(InteractionState::auto_focus).collect();
                assert_eq!(autos, vec![true, false, true, false]);
                let msg = Error::NotConverged { frames, trajectory }.to_string();
                assert!(msg.starts_with("convergence: no stable state after 20 frames"));
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("spinner converged"),
        }
    }
}
