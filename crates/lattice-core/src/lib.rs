//! Core types shared by the lattice crates.
//!
//! ## Modules
//!
//! - [`adt`]: the value graph, the graph arena and evaluator vertices
//! - [`bottom`]: error codes and the error combination algebra
//! - [`context`]: positioned, path-tracked error construction
//! - [`error`]: reportable error types
//! - [`label`]: label interning
//!
//! # Example
//!
//! ```
//! use lattice_core::{Bottom, ErrorCode, combine_bottoms};
//!
//! let fatal = Bottom::new(ErrorCode::UserError, "conflicting values");
//! let later = Bottom::new(ErrorCode::IncompleteError, "non-concrete value");
//!
//! let got = combine_bottoms(None, Some(&later), Some(&fatal)).unwrap();
//! assert_eq!(got.code, ErrorCode::UserError);
//! ```

pub mod adt;
pub mod bottom;
pub mod context;
pub mod error;
mod ids;
mod kind;
pub mod label;
mod ops;
mod span;

pub use adt::{Num, Value, ValueKind};
pub use bottom::{Bottom, ErrorCode, combine_bottoms, combine_errors, is_incomplete_bottom};
pub use context::OpContext;
pub use error::{ErrorList, ValueError};
pub use ids::{NodeId, ScopeId, UnitId, VertexId};
pub use kind::Kind;
pub use label::{Feature, LabelTable};
pub use ops::Op;
pub use span::Span;
