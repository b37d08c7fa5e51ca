//! Syntax tree for the lattice configuration language.
//!
//! The tree is produced by a parser and an optional name-binding pass that
//! live outside this workspace. This crate only defines the node types the
//! compiler consumes and an [`AstBuilder`](ast::AstBuilder) for allocating
//! them.

pub mod ast;

pub use ast::{AstBuilder, Decl, Expr, File};
