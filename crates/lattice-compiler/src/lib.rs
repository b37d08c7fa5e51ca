//! Lattice Compiler
//!
//! Lowers syntax trees into the value graph consumed by the evaluator.
//!
//! ## Architecture
//!
//! - **Scope map**: syntax nodes get stable graph nodes on first reference,
//!   so forward references resolve before their target is lowered
//! - **Lowering**: a single top-down walk turns every syntax node into one
//!   value, recording failures both in place and as diagnostics
//!
//! ## Modules
//!
//! - [`attrs`]: field attribute parsing
//! - [`literal`]: number and string literal decoding
//! - [`lower`]: the graph builder
//! - [`resolver`]: the import and builtin package seam
//! - [`scope`]: the syntax node to graph node map

pub mod attrs;
pub mod literal;
pub mod lower;
mod options;
pub mod resolver;
pub mod scope;

pub use attrs::{AttrError, create_attrs};
pub use literal::LiteralError;
pub use lower::GraphBuilder;
pub use options::BuildOptions;
pub use resolver::{ImportResolver, NoImports, PackageTable};
pub use scope::ScopeMap;
