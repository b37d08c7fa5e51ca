//! Expression nodes.
//!
//! Every node carries the [`NodeId`] assigned at allocation and the span of
//! its first token. Child nodes are arena references.

use lattice_core::{NodeId, Span};

use crate::ast::{Alias, Decl, Token};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Identifier reference
    Ident(&'ast Ident<'ast>),
    /// Literal token
    BasicLit(&'ast BasicLit<'ast>),
    /// `_|_`
    Bottom(&'ast BottomLit),
    /// Expression the parser could not make sense of
    Bad(&'ast BadExpr),
    /// `{ ... }`
    Struct(&'ast StructLit<'ast>),
    /// `[ ... ]`
    List(&'ast ListLit<'ast>),
    /// `[ x for x in y ]`
    ListComprehension(&'ast ListComprehension<'ast>),
    /// `"a \(b) c"`
    Interpolation(&'ast Interpolation<'ast>),
    /// `( x )`
    Paren(&'ast ParenExpr<'ast>),
    /// `x.sel`
    Selector(&'ast SelectorExpr<'ast>),
    /// `x[i]`
    Index(&'ast IndexExpr<'ast>),
    /// `x[lo:hi]`
    Slice(&'ast SliceExpr<'ast>),
    /// `f(args)`
    Call(&'ast CallExpr<'ast>),
    /// Prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Identity of this node.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Ident(e) => e.id,
            Self::BasicLit(e) => e.id,
            Self::Bottom(e) => e.id,
            Self::Bad(e) => e.id,
            Self::Struct(e) => e.id,
            Self::List(e) => e.id,
            Self::ListComprehension(e) => e.id,
            Self::Interpolation(e) => e.id,
            Self::Paren(e) => e.id,
            Self::Selector(e) => e.id,
            Self::Index(e) => e.id,
            Self::Slice(e) => e.id,
            Self::Call(e) => e.id,
            Self::Unary(e) => e.id,
            Self::Binary(e) => e.id,
        }
    }

    /// Source location.
    pub fn span(&self) -> Span {
        match self {
            Self::Ident(e) => e.span,
            Self::BasicLit(e) => e.span,
            Self::Bottom(e) => e.span,
            Self::Bad(e) => e.span,
            Self::Struct(e) => e.span,
            Self::List(e) => e.span,
            Self::ListComprehension(e) => e.span,
            Self::Interpolation(e) => e.span,
            Self::Paren(e) => e.span,
            Self::Selector(e) => e.span,
            Self::Index(e) => e.span,
            Self::Slice(e) => e.span,
            Self::Call(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Binary(e) => e.span,
        }
    }
}

/// An identifier.
///
/// A name-binding pass that runs before lowering may record what the
/// identifier refers to in `resolution`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ident<'ast> {
    pub id: NodeId,
    pub name: &'ast str,
    pub resolution: Option<Resolution<'ast>>,
    pub span: Span,
}

/// What an identifier was bound to by name resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'ast> {
    /// A field of the record declared by node `scope`; the reference selects
    /// the identifier's own name from that record.
    Scope(NodeId),
    /// Node that directly introduces the name: a `for` clause, a template
    /// field, or an import spec.
    Node(NodeId),
    /// An alias, expanded in place at each reference.
    Alias(&'ast Alias<'ast>),
}

/// The token kind of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LitKind {
    Int,
    Float,
    String,
    Null,
    True,
    False,
}

/// A literal token with its raw source text, including quotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicLit<'ast> {
    pub id: NodeId,
    pub kind: LitKind,
    pub value: &'ast str,
    pub span: Span,
}

/// `_|_`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottomLit {
    pub id: NodeId,
    pub span: Span,
}

/// An expression that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadExpr {
    pub id: NodeId,
    pub span: Span,
}

/// A record literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructLit<'ast> {
    pub id: NodeId,
    /// Absent for the brace-less single-field form `a b: 1`.
    pub lbrace: Option<Span>,
    pub elts: &'ast [Decl<'ast>],
    pub span: Span,
}

/// A list literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListLit<'ast> {
    pub id: NodeId,
    pub elts: &'ast [Expr<'ast>],
    /// Position of `...` if the list is open.
    pub ellipsis: Option<Span>,
    /// Element type after the ellipsis.
    pub typ: Option<Expr<'ast>>,
    pub span: Span,
}

/// `[ expr for k, v in src if cond ]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListComprehension<'ast> {
    pub id: NodeId,
    pub expr: Expr<'ast>,
    pub clauses: &'ast [Clause<'ast>],
    pub span: Span,
}

/// A `for` or `if` clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clause<'ast> {
    For(&'ast ForClause<'ast>),
    If(&'ast IfClause<'ast>),
}

/// `for key, value in source`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForClause<'ast> {
    pub id: NodeId,
    pub key: Option<&'ast Ident<'ast>>,
    pub value: &'ast Ident<'ast>,
    pub source: Expr<'ast>,
    pub span: Span,
}

/// `if condition`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfClause<'ast> {
    pub id: NodeId,
    pub condition: Expr<'ast>,
    pub span: Span,
}

/// A string with embedded expressions.
///
/// Elements alternate literal fragments and expressions, starting and ending
/// with a fragment: `"a \(`, `x`, `) b"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation<'ast> {
    pub id: NodeId,
    pub elts: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub id: NodeId,
    pub x: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorExpr<'ast> {
    pub id: NodeId,
    pub x: Expr<'ast>,
    pub sel: &'ast Ident<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    pub id: NodeId,
    pub x: Expr<'ast>,
    pub index: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceExpr<'ast> {
    pub id: NodeId,
    pub x: Expr<'ast>,
    pub low: Option<Expr<'ast>>,
    pub high: Option<Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub id: NodeId,
    pub fun: Expr<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub id: NodeId,
    pub op: Token,
    pub x: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub id: NodeId,
    pub op: Token,
    pub x: Expr<'ast>,
    pub y: Expr<'ast>,
    pub span: Span,
}
