//! Reportable error types.
//!
//! These are the only failure types that implement [`std::error::Error`].
//! Graph-level failures are [`Bottom`](crate::Bottom) values, which carry an
//! [`ErrorList`] and reach human-facing reporting through it.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ErrorList      - ordered list of causes, may be empty
//! └── ValueError - one message with positions and a field path
//! ```

use thiserror::Error;

use crate::Span;

// ============================================================================
// ValueError
// ============================================================================

/// A positioned diagnostic produced while building or evaluating a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_value_error(.message, .positions, .path))]
pub struct ValueError {
    message: String,
    positions: Vec<Span>,
    path: Vec<String>,
}

impl ValueError {
    /// Create a diagnostic with explicit positions and path.
    pub fn new(message: impl Into<String>, positions: Vec<Span>, path: Vec<String>) -> Self {
        Self {
            message: message.into(),
            positions,
            path,
        }
    }

    /// Create a diagnostic that has no position and no path.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::new(message, Vec::new(), Vec::new())
    }

    /// The message text, without path or position.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The primary position: the first recorded one, if any.
    pub fn position(&self) -> Option<Span> {
        self.positions.first().copied()
    }

    /// All source positions this error spans.
    pub fn input_positions(&self) -> &[Span] {
        &self.positions
    }

    /// Field selectors from the root to the failing node.
    pub fn path(&self) -> &[String] {
        &self.path
    }
}

fn render_value_error(message: &str, positions: &[Span], path: &[String]) -> String {
    let mut out = String::new();
    if !path.is_empty() {
        out.push_str(&path.join("."));
        out.push_str(": ");
    }
    out.push_str(message);
    if let Some(pos) = positions.first() {
        out.push_str(&format!(" (at {})", pos));
    }
    out
}

// ============================================================================
// ErrorList
// ============================================================================

/// An ordered list of errors. Multiple simultaneous failures at one node are
/// kept side by side rather than one replacing the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", render_error_list(.errors))]
pub struct ErrorList {
    errors: Vec<ValueError>,
}

impl ErrorList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate two lists, `a` first.
    pub fn append(a: &ErrorList, b: &ErrorList) -> ErrorList {
        let mut errors = Vec::with_capacity(a.len() + b.len());
        errors.extend(a.errors.iter().cloned());
        errors.extend(b.errors.iter().cloned());
        ErrorList { errors }
    }

    /// Add an error at the end.
    pub fn push(&mut self, err: ValueError) {
        self.errors.push(err);
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the list holds no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the errors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValueError> {
        self.errors.iter()
    }

    /// The messages, without paths or positions, joined by `"; "`.
    pub fn messages(&self) -> String {
        self.errors
            .iter()
            .map(ValueError::message)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn render_error_list(errors: &[ValueError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<ValueError> for ErrorList {
    fn from(err: ValueError) -> Self {
        ErrorList { errors: vec![err] }
    }
}

impl FromIterator<ValueError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = ValueError>>(iter: I) -> Self {
        ErrorList {
            errors: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a ValueError;
    type IntoIter = std::slice::Iter<'a, ValueError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
