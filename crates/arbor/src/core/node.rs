//! The published widget tree.

use std::fmt;

use crate::{path::IdPath, text::TranslatableText};

/// The kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Static text.
    Text,
    /// A pressable button.
    Button,
    /// A generic grouping of children.
    Container,
    /// A list of children.
    List,
    /// An editable text field.
    Input,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Button => "button",
            Self::Container => "container",
            Self::List => "list",
            Self::Input => "input",
        };
        f.write_str(s)
    }
}

/// A node in the widget tree. Trees are rebuilt wholesale from the model and
/// never patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Static text.
    Text {
        /// Node path.
        id: IdPath,
        /// Content.
        text: TranslatableText,
    },
    /// A pressable button.
    Button {
        /// Node path.
        id: IdPath,
        /// Button label.
        label: TranslatableText,
        /// Accepts interaction?
        enabled: bool,
    },
    /// A generic grouping of children.
    Container {
        /// Node path.
        id: IdPath,
        /// Children in declared order.
        children: Vec<Node>,
    },
    /// A list of children.
    List {
        /// Node path.
        id: IdPath,
        /// Children in declared order.
        children: Vec<Node>,
    },
    /// An editable text field.
    Input {
        /// Node path.
        id: IdPath,
        /// Optional label.
        label: Option<TranslatableText>,
        /// Committed value, as text.
        value: String,
        /// Accepts interaction?
        enabled: bool,
    },
}

impl Node {
    /// Node path.
    pub fn id(&self) -> &IdPath {
        match self {
            Self::Text { id, .. }
            | Self::Button { id, .. }
            | Self::Container { id, .. }
            | Self::List { id, .. }
            | Self::Input { id, .. } => id,
        }
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Text { .. } => NodeKind::Text,
            Self::Button { .. } => NodeKind::Button,
            Self::Container { .. } => NodeKind::Container,
            Self::List { .. } => NodeKind::List,
            Self::Input { .. } => NodeKind::Input,
        }
    }

    /// Children, empty for leaves.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Container { children, .. } | Self::List { children, .. } => children,
            _ => &[],
        }
    }

    /// Label of a button or input, or the content of a text node.
    pub fn label(&self) -> Option<&TranslatableText> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Button { label, .. } => Some(label),
            Self::Input { label, .. } => label.as_ref(),
            _ => None,
        }
    }

    /// Committed value of an input.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Input { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Is this node enabled? Non-interactive nodes always are.
    pub fn enabled(&self) -> bool {
        match self {
            Self::Button { enabled, .. } | Self::Input { enabled, .. } => *enabled,
            _ => true,
        }
    }

    /// Does this node take part in the interaction protocol?
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Button { .. } | Self::Input { .. })
    }

    /// Find the innermost node with path `id`. Subtrees whose path is not a
    /// prefix of `id` are skipped.
    pub fn find(&self, id: &IdPath) -> Option<&Self> {
        if !id.starts_with(self.id()) {
            return None;
        }
        self.children()
            .iter()
            .find_map(|c| c.find(id))
            .or_else(|| (self.id() == id).then_some(self))
    }

    /// Preorder traversal.
    pub fn walk(&self, f: &mut dyn FnMut(&Self)) {
        f(self);
        for c in self.children() {
            c.walk(f);
        }
    }

    /// All nodes in preorder.
    pub fn nodes(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for c in self.children() {
            out.extend(c.nodes());
        }
        out
    }

    /// Write an indented outline of this subtree.
    fn outline(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        write!(f, "{}{} {}", "  ".repeat(level), self.kind(), self.id().route())?;
        if let Some(label) = self.label() {
            write!(f, " {:?}", label.translate())?;
        }
        if let Some(value) = self.value() {
            write!(f, " = {value:?}")?;
        }
        if !self.enabled() {
            write!(f, " (disabled)")?;
        }
        writeln!(f)?;
        for c in self.children() {
            c.outline(f, level + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.outline(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Node {
        Node::Container {
            id: IdPath::root(),
            children: vec![
                Node::Text {
                    id: IdPath::root(),
                    text: "Title".into(),
                },
                Node::List {
                    id: IdPath::from("/rows"),
                    children: vec![Node::Input {
                        id: IdPath::from("/rows/0"),
                        label: None,
                        value: "3".into(),
                        enabled: true,
                    }],
                },
                Node::Button {
                    id: IdPath::from("/save"),
                    label: "Save".into(),
                    enabled: false,
                },
            ],
        }
    }

    #[test]
    fn find_prefers_innermost() {
        let tree = sample();
        let input = tree.find(&IdPath::from("/rows/0"));
        assert_eq!(input.map(Node::kind), Some(NodeKind::Input));
        assert_eq!(input.and_then(Node::value), Some("3"));

        // The root path is shared by the container and the title.
        assert_eq!(tree.find(&IdPath::root()).map(Node::kind), Some(NodeKind::Text));
        assert!(tree.find(&IdPath::from("/rows/1")).is_none());
        assert!(!tree.find(&IdPath::from("/save")).is_some_and(Node::enabled));
    }

    #[test]
    fn walk_is_preorder() {
        let mut kinds = vec![];
        sample().walk(&mut |n| kinds.push(n.kind()));
        assert_eq!(
            kinds,
            vec![
                NodeKind::Container,
                NodeKind::Text,
                NodeKind::List,
                NodeKind::Input,
                NodeKind::Button
            ]
        );
        assert_eq!(sample().nodes().len(), 5);
    }

    #[test]
    fn outline() {
        assert_eq!(
            sample().to_string(),
            "container /\n  text / \"Title\"\n  list /rows\n    input /rows/0 = \"3\"\n  button /save \"Save\" (disabled)\n"
        );
    }
}
