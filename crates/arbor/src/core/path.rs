use std::{fmt, str::FromStr, sync::Arc};

use regex::Regex;

use crate::error::{self, Result};

/// A structural widget identifier: the sequence of scope names pushed while
/// walking down the widget tree.
///
/// Paths are immutable values. Pushing or popping produces a new path and
/// leaves the original untouched, so a path can be captured by any number of
/// closures without coordination. Equality is positional: two paths are equal
/// when they have the same segments in the same order.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IdPath {
    /// Stored segments, outermost first.
    segments: Arc<[String]>,
}

impl Default for IdPath {
    fn default() -> Self {
        Self::root()
    }
}

impl IdPath {
    /// The empty path, used as the starting point of every tree build.
    pub fn root() -> Self {
        Self {
            segments: Arc::from(Vec::new()),
        }
    }

    /// Construct a path from segments given outermost first.
    pub fn new<I>(v: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let segments: Vec<String> = v.into_iter().map(|x| x.as_ref().to_string()).collect();
        Self {
            segments: Arc::from(segments),
        }
    }

    /// Return a new path with `segment` as its innermost component.
    #[must_use]
    pub fn push(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.to_vec();
        segments.push(segment.into());
        Self {
            segments: Arc::from(segments),
        }
    }

    /// Return a new path without its innermost component. Popping the root
    /// path yields the root path.
    #[must_use]
    pub fn pop(&self) -> Self {
        match self.segments.split_last() {
            Some((_, rest)) => Self {
                segments: Arc::from(rest),
            },
            None => self.clone(),
        }
    }

    /// The most recently pushed segment, if any.
    pub fn innermost(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Is this the root path?
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate over segments, outermost first.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Does this path lie at or below `ancestor`?
    pub fn starts_with(&self, ancestor: &Self) -> bool {
        self.segments.starts_with(&ancestor.segments)
    }

    /// Segments joined innermost to outermost, the form used in log output.
    pub fn to_display_string(&self) -> String {
        self.segments().rev().collect::<Vec<_>>().join("/")
    }

    /// The outermost-first `/a/b/c` form. This is the form path matchers
    /// operate on, and the form [`FromStr`] parses.
    pub fn route(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl fmt::Display for IdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl fmt::Debug for IdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdPath({})", self.route())
    }
}

impl FromStr for IdPath {
    type Err = error::Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::from(s))
    }
}

impl From<&str> for IdPath {
    fn from(v: &str) -> Self {
        Self::new(v.split('/').filter(|x| !x.is_empty()))
    }
}

impl From<&[&str]> for IdPath {
    fn from(v: &[&str]) -> Self {
        Self::new(v.iter().filter(|x| !x.is_empty()))
    }
}

impl From<Vec<String>> for IdPath {
    fn from(path: Vec<String>) -> Self {
        Self {
            segments: Arc::from(path),
        }
    }
}

/// A match expression that can be applied to paths.
///
/// Filters are written outermost first. A `*` component matches any number of
/// segments, a leading slash anchors the match at the root, and a trailing
/// slash anchors it at the innermost segment. Matches always align with
/// segment boundaries.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    /// Original filter string used to construct the matcher.
    filter: Box<str>,
    /// Compiled regular expression.
    expr: Regex,
}

impl PathMatcher {
    /// Compile a path matcher from a filter string.
    pub fn new(path: &str) -> Result<Self> {
        let body = path
            .split('/')
            .filter_map(|x| {
                if x == "*" {
                    Some(String::from("(?:/[^/]+)*"))
                } else if !x.is_empty() {
                    Some(format!("/{}", regex::escape(x)))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");
        let head = if path.starts_with('/') { "^" } else { "" };
        let tail = if path.len() > 1 && path.ends_with('/') {
            "/?$"
        } else {
            "(?:/|$)"
        };
        let expr = Regex::new(&format!("{head}{body}{tail}"))
            .map_err(|e| error::Error::Invalid(e.to_string()))?;
        Ok(Self {
            filter: path.into(),
            expr,
        })
    }

    /// Return the original filter string used to construct this matcher.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Check whether the filter matches a given path.
    pub fn matches(&self, path: &IdPath) -> bool {
        self.expr.is_match(&path.route())
    }
}
