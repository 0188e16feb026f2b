//! Ambient configuration threaded through tree construction.

use crate::{path::IdPath, text::TranslatableText};

/// The context a widget builder runs against: the path of the scope being
/// built, whether that scope is enabled, and a pending label.
///
/// Contexts are values. Overrides produce a derived context for the duration
/// of a subtree build and the parent context is never modified, so sibling
/// subtrees cannot observe each other's overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Path of the scope currently being built.
    current_path: IdPath,
    /// Whether widgets in this scope accept interaction.
    enabled: bool,
    /// Label to attach to the next labelled widget.
    label: Option<TranslatableText>,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::root()
    }
}

impl BuildContext {
    /// The context every tree build starts from: empty path, enabled, no label.
    pub fn root() -> Self {
        Self {
            current_path: IdPath::root(),
            enabled: true,
            label: None,
        }
    }

    /// Path of the scope currently being built.
    pub fn current_path(&self) -> &IdPath {
        &self.current_path
    }

    /// Is this scope enabled?
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Pending label, if any.
    pub fn label(&self) -> Option<&TranslatableText> {
        self.label.as_ref()
    }

    /// A derived context with `segment` pushed onto the path.
    #[must_use]
    pub fn pushed_id(&self, segment: impl Into<String>) -> Self {
        Self {
            current_path: self.current_path.push(segment),
            ..self.clone()
        }
    }

    /// A derived context with the enabled flag replaced.
    #[must_use]
    pub fn set_enabled(&self, enabled: bool) -> Self {
        Self {
            enabled,
            ..self.clone()
        }
    }

    /// A derived context carrying `label`.
    #[must_use]
    pub fn set_label(&self, label: TranslatableText) -> Self {
        Self {
            label: Some(label),
            ..self.clone()
        }
    }

    /// Run `f` in a scope extended by `segment`.
    pub fn with_pushed_id<T>(&self, segment: impl Into<String>, f: impl FnOnce(&Self) -> T) -> T {
        f(&self.pushed_id(segment))
    }

    /// Run `f` in a scope with the enabled flag replaced.
    pub fn with_enabled<T>(&self, enabled: bool, f: impl FnOnce(&Self) -> T) -> T {
        f(&self.set_enabled(enabled))
    }

    /// Run `f` in a scope carrying `label`.
    pub fn with_label<T>(&self, label: TranslatableText, f: impl FnOnce(&Self) -> T) -> T {
        f(&self.set_label(label))
    }
}
