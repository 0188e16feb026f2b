use crate::{node::Node, text::TranslatableText};

use super::{Widget, WidgetBuilder};

/// Static text. Never interactive.
pub fn text<M: 'static>(text: impl Into<TranslatableText>) -> WidgetBuilder<M> {
    let text = text.into();
    WidgetBuilder::new(move |ctx| {
        Widget::inert(Node::Text {
            id: ctx.current_path().clone(),
            text,
        })
    })
}
