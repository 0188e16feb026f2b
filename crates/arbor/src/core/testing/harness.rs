use crate::{
    error::Result,
    gesture::Gesture,
    path::IdPath,
    runner::{Convergence, Runner, RunnerBuilder},
    view::{WidgetView, render},
    widgets::WidgetBuilder,
};

/// A runner wrapper for tests. Gestures are addressed by route strings such
/// as `/inputs/div0/name0`, and every gesture is delivered the same way a
/// render layer would deliver it.
pub struct Harness<M> {
    /// The runner under test.
    pub runner: Runner<M>,
}

impl<M: 'static> Harness<M> {
    /// A harness around a default-configured runner.
    pub fn new(model: M, view: impl Fn(&M) -> WidgetBuilder<M> + 'static) -> Result<Self> {
        Ok(Self {
            runner: Runner::new(model, view)?,
        })
    }

    /// A harness around a runner from a configured builder.
    pub fn with_builder(builder: RunnerBuilder<M>) -> Result<Self> {
        Ok(Self {
            runner: builder.build()?,
        })
    }

    /// Deliver a gesture.
    pub fn gesture(&mut self, g: Gesture) -> Result<Option<Convergence>> {
        g.apply(&mut self.runner)
    }

    /// Focus the widget at `route`.
    pub fn focus(&mut self, route: &str) -> Result<Option<Convergence>> {
        self.gesture(Gesture::Focus(route.into()))
    }

    /// Blur the widget at `route`.
    pub fn blur(&mut self, route: &str) -> Result<Option<Convergence>> {
        self.gesture(Gesture::Blur(route.into()))
    }

    /// Press and release the widget at `route`.
    pub fn press(&mut self, route: &str) -> Result<Option<Convergence>> {
        self.gesture(Gesture::Press(route.into()))
    }

    /// Replace the edit buffer of the widget at `route`.
    pub fn type_text(&mut self, route: &str, text: &str) -> Result<Option<Convergence>> {
        self.gesture(Gesture::ChangeText(route.into(), text.into()))
    }

    /// Tab out of the widget at `route`.
    pub fn tab(&mut self, route: &str) -> Result<Option<Convergence>> {
        self.gesture(Gesture::TabNext(route.into()))
    }

    /// Dispatch without changing anything.
    pub fn settle(&mut self) -> Result<Convergence> {
        self.runner.dispatch(|s| s)
    }

    /// Route of the focused widget.
    pub fn focused_route(&self) -> Option<String> {
        self.runner.state().focused_id().map(IdPath::route)
    }

    /// Route of the active widget.
    pub fn active_route(&self) -> Option<String> {
        self.runner.state().active_id().map(IdPath::route)
    }

    /// The view of the node at `route`.
    pub fn view(&self, route: &str) -> Option<WidgetView> {
        self.runner.view_of(route)
    }

    /// The displayed value of the input at `route`.
    pub fn value(&self, route: &str) -> Option<String> {
        self.view(route).and_then(|v| v.raw_value)
    }

    /// The application model.
    pub fn model(&self) -> &M {
        self.runner.model()
    }

    /// The tree as plain text.
    pub fn screen(&self) -> String {
        render(self.runner.tree(), self.runner.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        tr,
        widgets::{button, container, string},
    };

    fn form(model: &(String, u32)) -> WidgetBuilder<(String, u32)> {
        container(vec![
            string(model.0.clone(), |m: &mut (String, u32), v| m.0 = v).id("name"),
            button(|m: &mut (String, u32)| m.1 += 1)
                .label(tr!("Save"))
                .id("save"),
        ])
    }

    #[test]
    fn drive_by_route() -> Result<()> {
        let mut h = Harness::new((String::from("a"), 0), form)?;
        h.focus("/name")?;
        assert_eq!(h.active_route().as_deref(), Some("/name"));

        assert!(h.type_text("/name", "abc")?.is_none());
        assert_eq!(h.value("/name").as_deref(), Some("abc"));

        h.press("/save")?;
        assert_eq!(h.model(), &(String::from("abc"), 1));
        assert_eq!(h.focused_route().as_deref(), Some("/save"));
        assert!(h.active_route().is_none());
        assert_eq!(h.screen(), "  abc\n> [Save]\n");
        Ok(())
    }

    #[test]
    fn unknown_routes() -> Result<()> {
        let mut h = Harness::new((String::new(), 0), form)?;
        assert!(matches!(h.press("/nope"), Err(Error::NotFound(_))));
        assert!(h.tab("/name")?.is_none());
        h.settle()?;
        Ok(())
    }
}
