//! Abstract Syntax Tree (AST) for lattice source files.
//!
//! This module provides:
//! - node definitions for declarations and expressions
//! - operator tokens
//! - [`AstBuilder`], which allocates nodes in an arena and numbers them
//!
//! All nodes borrow from a [`bumpalo::Bump`] and remain valid for the
//! lifetime of the arena.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use lattice_syntax::ast::{AstBuilder, Decl};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let file = b.file(&[
//!     b.field(b.label("a"), b.int("1")),
//!     b.field(b.label("b"), b.string("\"two\"")),
//! ]);
//! assert_eq!(file.decls.len(), 2);
//! assert!(matches!(file.decls[0], Decl::Field(_)));
//! ```

mod builder;
pub mod decl;
pub mod expr;
pub mod ops;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use ops::*;

use lattice_core::{NodeId, Span};

/// A source file: a list of top-level declarations.
///
/// The file is the outermost record scope; references to top-level fields
/// carry the file's id as their resolution scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct File<'ast> {
    pub id: NodeId,
    pub decls: &'ast [Decl<'ast>],
    pub span: Span,
}

impl<'ast> File<'ast> {
    /// Import declarations of this file, in source order.
    pub fn imports(&self) -> impl Iterator<Item = &'ast ImportDecl<'ast>> + 'ast {
        self.decls.iter().filter_map(|d| match d {
            Decl::Import(i) => Some(*i),
            _ => None,
        })
    }
}
