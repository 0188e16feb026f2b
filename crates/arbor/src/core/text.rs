use std::fmt;

/// A piece of user-facing text awaiting translation: a template split at its
/// `{}` placeholders, plus the values to interleave.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslatableText {
    /// Literal template fragments. There is always one more fragment than
    /// placeholders.
    strings: Vec<String>,
    /// Placeholder values, in order.
    values: Vec<String>,
}

impl TranslatableText {
    /// Construct text from a `{}` template and its values.
    pub fn new(template: &str, values: Vec<String>) -> Self {
        Self {
            strings: template.split("{}").map(str::to_string).collect(),
            values,
        }
    }

    /// Text with no placeholders.
    pub fn raw(s: impl Into<String>) -> Self {
        Self {
            strings: vec![s.into()],
            values: vec![],
        }
    }

    /// Template fragments.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Placeholder values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Produce display text. This is a stub: fragments and values are joined
    /// verbatim, without locale-aware number or date formatting. Missing values
    /// render as empty, surplus values are dropped.
    pub fn translate(&self) -> String {
        let mut out = String::new();
        for (i, s) in self.strings.iter().enumerate() {
            out.push_str(s);
            let placeholder = i + 1 < self.strings.len();
            if let Some(v) = self.values.get(i).filter(|_| placeholder) {
                out.push_str(v);
            }
        }
        out
    }
}

impl fmt::Display for TranslatableText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.translate())
    }
}

impl From<&str> for TranslatableText {
    fn from(s: &str) -> Self {
        Self::raw(s)
    }
}

impl From<String> for TranslatableText {
    fn from(s: String) -> Self {
        Self::raw(s)
    }
}

/// Build a [`TranslatableText`] from a `{}` template and values.
///
/// ```
/// let t = arbor::tr!("Counter {}", 3);
/// assert_eq!(t.translate(), "Counter 3");
/// ```
#[macro_export]
macro_rules! tr {
    ($template:literal $(, $value:expr)* $(,)?) => {
        $crate::text::TranslatableText::new(
            $template,
            ::std::vec::Vec::<::std::string::String>::from([
                $(::std::string::ToString::to_string(&$value)),*
            ]),
        )
    };
}
