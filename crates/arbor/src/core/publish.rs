//! Path-keyed subscriptions to widget views.

use std::collections::{HashMap, HashSet};

use crate::{
    error::Result,
    node::{Node, NodeKind},
    path::{IdPath, PathMatcher},
    state::InteractionState,
    view::WidgetView,
};

/// Handle for removing a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A single subscription.
struct Subscription {
    /// Handle.
    id: SubscriptionId,
    /// Which nodes to watch.
    matcher: PathMatcher,
    /// Receives changed views.
    callback: Box<dyn FnMut(&WidgetView)>,
    /// Last view delivered per node.
    last: HashMap<(IdPath, NodeKind), WidgetView>,
}

/// Registry of view subscriptions.
///
/// On every publish each subscription is offered the view of every node whose
/// path it matches, and the callback runs only when that view differs from the
/// one last delivered.
#[derive(Default)]
pub struct Subscriptions {
    /// Next handle to hand out.
    next: u64,
    /// Live subscriptions, in registration order.
    entries: Vec<Subscription>,
}

impl Subscriptions {
    /// Register a callback for nodes matching `pattern`.
    pub fn add(
        &mut self,
        pattern: &str,
        callback: impl FnMut(&WidgetView) + 'static,
    ) -> Result<SubscriptionId> {
        let matcher = PathMatcher::new(pattern)?;
        let id = SubscriptionId(self.next);
        self.next += 1;
        self.entries.push(Subscription {
            id,
            matcher,
            callback: Box::new(callback),
            last: HashMap::new(),
        });
        Ok(id)
    }

    /// Remove a subscription.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s.id != id);
        self.entries.len() != before
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Are there no subscriptions?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offer the current views to every subscription. Nodes that left the
    /// tree are forgotten, so a node that comes back is delivered again.
    pub fn notify(&mut self, tree: &Node, state: &InteractionState) {
        if self.entries.is_empty() {
            return;
        }
        let nodes = tree.nodes();
        for sub in &mut self.entries {
            let mut present = HashSet::new();
            for node in nodes.iter().filter(|n| sub.matcher.matches(n.id())) {
                let view = WidgetView::of(node, state);
                let key = (view.id.clone(), view.kind);
                present.insert(key.clone());
                if sub.last.get(&key) != Some(&view) {
                    (sub.callback)(&view);
                    sub.last.insert(key, view);
                }
            }
            sub.last.retain(|key, _| present.contains(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn tree() -> Node {
        Node::Container {
            id: IdPath::root(),
            children: ["a", "b"]
                .into_iter()
                .map(|s| Node::Input {
                    id: IdPath::new(["rows", s]),
                    label: None,
                    value: String::new(),
                    enabled: true,
                })
                .collect(),
        }
    }

    #[test]
    fn notifies_matching_changes_only() -> Result<()> {
        let seen = Rc::new(RefCell::new(vec![]));
        let log = seen.clone();
        let mut subs = Subscriptions::default();
        let id = subs.add("/rows/*", move |v| log.borrow_mut().push(v.id.route()))?;
        assert_eq!(subs.len(), 1);

        subs.notify(&tree(), &InteractionState::new());
        assert_eq!(*seen.borrow(), vec!["/rows/a", "/rows/b"]);

        subs.notify(&tree(), &InteractionState::new());
        assert_eq!(seen.borrow().len(), 2);

        let focused = InteractionState::new().set_focused_id(Some(IdPath::from("/rows/b")));
        subs.notify(&tree(), &focused);
        assert_eq!(seen.borrow().last().map(String::as_str), Some("/rows/b"));
        assert_eq!(seen.borrow().len(), 3);

        assert!(subs.remove(id));
        assert!(subs.is_empty());
        Ok(())
    }

    #[test]
    fn returning_nodes_are_redelivered() -> Result<()> {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let mut subs = Subscriptions::default();
        subs.add("/rows/b", move |_| *c.borrow_mut() += 1)?;
        let state = InteractionState::new();
        let full = tree();
        let mut pruned = tree();
        if let Node::Container { children, .. } = &mut pruned {
            children.truncate(1);
        }

        subs.notify(&full, &state);
        subs.notify(&pruned, &state);
        assert_eq!(*count.borrow(), 1);
        subs.notify(&full, &state);
        assert_eq!(*count.borrow(), 2);
        assert!(subs.entries.iter().all(|s| s.last.len() == 1));
        Ok(())
    }

    #[test]
    fn anchoring() -> Result<()> {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let mut subs = Subscriptions::default();
        subs.add("b/", move |_| *c.borrow_mut() += 1)?;
        subs.notify(&tree(), &InteractionState::new());
        assert_eq!(*count.borrow(), 1);
        Ok(())
    }
}
