use crate::{container::combine, node::Node, path::IdPath};

use super::{Widget, WidgetBuilder};

/// Build `children` in the enclosing scope and fold their transitions.
fn group<M: 'static>(
    children: Vec<WidgetBuilder<M>>,
    node: fn(IdPath, Vec<Node>) -> Node,
) -> WidgetBuilder<M> {
    WidgetBuilder::new(move |ctx| {
        let (nodes, transitions): (Vec<_>, Vec<_>) = children
            .into_iter()
            .map(|c| {
                let w = c.build(ctx);
                (w.ui, w.transition)
            })
            .unzip();
        Widget {
            ui: node(ctx.current_path().clone(), nodes),
            transition: combine(transitions),
        }
    })
}

/// Group children. Children are evaluated in declared order.
pub fn container<M: 'static>(children: Vec<WidgetBuilder<M>>) -> WidgetBuilder<M> {
    group(children, |id, children| Node::Container { id, children })
}

/// A list of children. Interaction behaves exactly as for [`container`].
pub fn list<M: 'static>(children: Vec<WidgetBuilder<M>>) -> WidgetBuilder<M> {
    group(children, |id, children| Node::List { id, children })
}
