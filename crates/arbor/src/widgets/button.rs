use std::rc::Rc;

use crate::{
    interactive::{Behavior, Interactive},
    next::{Effect, Next},
    node::Node,
    path::IdPath,
    state::InteractionState,
    text::TranslatableText,
};

use super::{Widget, WidgetBuilder};

/// Label used when no label is in scope.
const DEFAULT_LABEL: &str = "Button";

/// Press handling for buttons.
struct Press<M> {
    /// Model update to run once per activation.
    on_press: Rc<dyn Fn(&mut M)>,
}

impl<M: 'static> Behavior<M> for Press<M> {
    fn wants_activate(&self, id: &IdPath, state: &InteractionState) -> bool {
        state.is_focused(id) && state.is_pressed(id)
    }

    fn wants_deactivate(&self, id: &IdPath, state: &InteractionState) -> bool {
        !state.is_pressed(id) || !state.is_focused(id)
    }

    fn when_active(&self, id: &IdPath, state: &InteractionState) -> Next<M> {
        if state.active_id_was_pressed_before() {
            return Next::Halt;
        }
        let on_press = self.on_press.clone();
        let next = state.clone().set_active_id_was_pressed_before(true);
        Next::SuspendAndResume(Effect::new(format!("press {id}"), move |m| {
            on_press(m);
            next
        }))
    }

    fn when_not_active(&self, id: &IdPath, state: &InteractionState) -> Next<M> {
        if state.is_pressed(id) && !state.is_focused(id) {
            Next::Continue(state.clone().set_focused_id(Some(id.clone())))
        } else {
            Next::Halt
        }
    }
}

/// A button. Pressing it focuses it, and `on_press` runs exactly once per
/// press. The label comes from the enclosing `label` attribute.
pub fn button<M: 'static>(on_press: impl Fn(&mut M) + 'static) -> WidgetBuilder<M> {
    let on_press: Rc<dyn Fn(&mut M)> = Rc::new(on_press);
    WidgetBuilder::new(move |ctx| {
        let id = ctx.current_path().clone();
        let label = ctx
            .label()
            .cloned()
            .unwrap_or_else(|| TranslatableText::raw(DEFAULT_LABEL));
        Widget {
            ui: Node::Button {
                id: id.clone(),
                label,
                enabled: ctx.enabled(),
            },
            transition: Interactive::new(id, ctx.enabled(), Press { on_press }).into(),
        }
    })
}
