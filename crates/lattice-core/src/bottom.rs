//! The error/bottom algebra.
//!
//! A [`Bottom`] is a failure carried as a value:
//! - it is a [`Value`] and belongs to a single graph position,
//! - it does NOT implement [`std::error::Error`],
//! - its [`ErrorCode`] is the only property that may influence control flow.
//!
//! Reportable errors ([`ErrorList`], [`ValueError`](crate::ValueError)) ride
//! along inside a bottom and are the only thing a human ever sees of it.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{ErrorList, Span, Value, ValueError};

/// The type of an error, ordered from most to least final.
///
/// The discriminant is the severity: a lower code always wins when two errors
/// meet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum ErrorCode {
    /// A fatal evaluation error.
    EvalError = 0,

    /// A fatal error originating from the user.
    UserError = 1,

    /// A value does not exist. Kept for compatibility; nothing in the
    /// builder produces it.
    NotExistError = 2,

    /// A structural cycle. Permanent for the node it occurs on, but not
    /// passed up recursively: unifying a structurally cyclic value with one
    /// that is not may still give a useful result.
    StructuralCycleError = 3,

    /// Evaluation could not complete for lack of information that may still
    /// be added later.
    IncompleteError = 4,

    /// A reference cycle. Incomplete, as providing a concrete value may break
    /// the cycle.
    CycleError = 5,
}

impl ErrorCode {
    /// Whether the error may still resolve with more information.
    #[inline]
    pub fn is_incomplete(self) -> bool {
        matches!(self, ErrorCode::IncompleteError | ErrorCode::CycleError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCode::EvalError => "eval",
            ErrorCode::UserError => "user",
            ErrorCode::StructuralCycleError => "structural cycle",
            ErrorCode::IncompleteError => "incomplete",
            ErrorCode::CycleError => "cycle",
            ErrorCode::NotExistError => "unknown",
        })
    }
}

/// An error or bottom symbol.
///
/// Although a bottom holds control data, it is only created once that data
/// already resulted in an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Bottom {
    pub src: Option<Span>,
    pub err: ErrorList,
    pub code: ErrorCode,
    /// Set once a descendant's error has been folded in.
    pub has_recursive: bool,
    /// `err` is the error of a descendant rather than of this node.
    pub child_error: bool,
    /// The value computed so far, kept for diagnostics.
    pub value: Option<Box<Value>>,
}

impl Bottom {
    /// A bottom with a single position-less message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_errors(code, ValueError::message_only(message).into())
    }

    /// A bottom carrying the given errors.
    pub fn with_errors(code: ErrorCode, err: ErrorList) -> Self {
        Self {
            src: None,
            err,
            code,
            has_recursive: false,
            child_error: false,
            value: None,
        }
    }

    /// Set the source position.
    pub fn at(mut self, src: Option<Span>) -> Self {
        self.src = src;
        self
    }

    /// Whether this error may still resolve.
    pub fn is_incomplete(&self) -> bool {
        self.code.is_incomplete()
    }

    /// The carried messages, joined.
    pub fn message(&self) -> String {
        self.err.messages()
    }
}

/// Reports whether an optional bottom is incomplete. An absent bottom is not.
pub fn is_incomplete_bottom(b: Option<&Bottom>) -> bool {
    b.is_some_and(Bottom::is_incomplete)
}

/// Combine two errors that originate at the same node.
///
/// If only one operand is a bottom it is returned unchanged. Otherwise a
/// fatal error always wins over an incomplete one, and two errors of which
/// neither is discarded merge into a new bottom at `src` with the lower code
/// and both messages, `x`'s first.
pub fn combine_errors(src: Option<Span>, x: Option<&Value>, y: Option<&Value>) -> Option<Bottom> {
    combine_bottoms(
        src,
        x.and_then(Value::as_bottom),
        y.and_then(Value::as_bottom),
    )
}

/// [`combine_errors`] for operands already known to be bottoms or absent.
pub fn combine_bottoms(src: Option<Span>, x: Option<&Bottom>, y: Option<&Bottom>) -> Option<Bottom> {
    let (mut a, mut b) = match (x, y) {
        (Some(a), Some(b)) => (a, b),
        (Some(a), None) => return Some(a.clone()),
        (None, Some(b)) => return Some(b.clone()),
        (None, None) => return None,
    };

    if a.code != b.code {
        if a.code > b.code {
            std::mem::swap(&mut a, &mut b);
        }
        if b.code.is_incomplete() {
            return Some(a.clone());
        }
    }

    Some(Bottom {
        src,
        err: ErrorList::append(&a.err, &b.err),
        code: a.code,
        has_recursive: false,
        child_error: false,
        value: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottom(code: ErrorCode, msg: &str) -> Bottom {
        Bottom::new(code, msg)
    }

    const ALL: [ErrorCode; 6] = [
        ErrorCode::EvalError,
        ErrorCode::UserError,
        ErrorCode::NotExistError,
        ErrorCode::StructuralCycleError,
        ErrorCode::IncompleteError,
        ErrorCode::CycleError,
    ];

    #[test]
    fn codes_are_ordered_by_discriminant() {
        for w in ALL.windows(2) {
            assert!(w[0] < w[1]);
            assert_eq!(u8::from(w[0]) + 1, u8::from(w[1]));
        }
        assert_eq!(
            ErrorCode::try_from(3u8).ok(),
            Some(ErrorCode::StructuralCycleError)
        );
        assert!(ErrorCode::try_from(6u8).is_err());
    }

    #[test]
    fn incomplete_class() {
        let incomplete: Vec<_> = ALL.iter().filter(|c| c.is_incomplete()).collect();
        assert_eq!(
            incomplete,
            [&ErrorCode::IncompleteError, &ErrorCode::CycleError]
        );
        assert!(!is_incomplete_bottom(None));
        assert!(is_incomplete_bottom(Some(&bottom(ErrorCode::CycleError, "c"))));
    }

    #[test]
    fn display_names() {
        assert_eq!(ErrorCode::EvalError.to_string(), "eval");
        assert_eq!(ErrorCode::StructuralCycleError.to_string(), "structural cycle");
        assert_eq!(ErrorCode::NotExistError.to_string(), "unknown");
    }

    #[test]
    fn combine_with_absent_operands() {
        let a = bottom(ErrorCode::UserError, "a");
        assert_eq!(combine_bottoms(None, None, None), None);
        assert_eq!(combine_bottoms(None, Some(&a), None), Some(a.clone()));
        assert_eq!(combine_bottoms(None, None, Some(&a)), Some(a.clone()));
    }

    #[test]
    fn combine_ignores_non_bottom_values() {
        let a = Value::from(bottom(ErrorCode::EvalError, "a"));
        let top = Value::top();
        let got = combine_errors(None, Some(&top), Some(&a)).unwrap();
        assert_eq!(got.code, ErrorCode::EvalError);
        assert_eq!(combine_errors(None, Some(&top), Some(&top)), None);
    }

    #[test]
    fn fatal_wins_over_incomplete_in_either_order() {
        for fatal in ALL.iter().filter(|c| !c.is_incomplete()) {
            for incomplete in ALL.iter().filter(|c| c.is_incomplete()) {
                let a = bottom(*fatal, "fatal");
                let b = bottom(*incomplete, "incomplete");
                let pos = Some(Span::new(1, 1, 0));
                assert_eq!(combine_bottoms(pos, Some(&a), Some(&b)), Some(a.clone()));
                assert_eq!(combine_bottoms(pos, Some(&b), Some(&a)), Some(a.clone()));
            }
        }
    }

    #[test]
    fn equal_codes_merge_messages_in_argument_order() {
        let pos = Some(Span::new(4, 2, 1));
        let a = bottom(ErrorCode::UserError, "first");
        let b = bottom(ErrorCode::UserError, "second");
        let got = combine_bottoms(pos, Some(&a), Some(&b)).unwrap();
        assert_eq!(got.code, ErrorCode::UserError);
        assert_eq!(got.src, pos);
        assert_eq!(got.message(), "first; second");
    }

    #[test]
    fn different_fatal_codes_merge_under_the_lower_code() {
        let a = bottom(ErrorCode::StructuralCycleError, "cyclic");
        let b = bottom(ErrorCode::EvalError, "eval");
        let got = combine_bottoms(None, Some(&a), Some(&b)).unwrap();
        assert_eq!(got.code, ErrorCode::EvalError);
        assert_eq!(got.message(), "eval; cyclic");
    }

    #[test]
    fn less_specific_incomplete_error_is_discarded() {
        let a = bottom(ErrorCode::CycleError, "cycle");
        let b = bottom(ErrorCode::IncompleteError, "incomplete");
        let got = combine_bottoms(None, Some(&a), Some(&b)).unwrap();
        assert_eq!(got, b);
    }

    #[test]
    fn equal_incomplete_codes_merge() {
        let a = bottom(ErrorCode::IncompleteError, "x");
        let b = bottom(ErrorCode::IncompleteError, "y");
        let got = combine_bottoms(None, Some(&a), Some(&b)).unwrap();
        assert_eq!(got.code, ErrorCode::IncompleteError);
        assert_eq!(got.err.len(), 2);
    }
}
