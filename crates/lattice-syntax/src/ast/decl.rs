//! Declaration nodes: fields, aliases, comprehensions, emits and imports.

use lattice_core::{NodeId, Span};

use crate::ast::{BasicLit, Clause, Expr, Ident, Interpolation};

/// A declaration inside a file or record body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decl<'ast> {
    /// `label: value`
    Field(&'ast Field<'ast>),
    /// `X = expr`
    Alias(&'ast Alias<'ast>),
    /// `for x in y { label: value }`
    Comprehension(&'ast ComprehensionDecl<'ast>),
    /// A bare expression at file level
    Emit(&'ast EmitDecl<'ast>),
    /// `import "path"`
    Import(&'ast ImportDecl<'ast>),
    /// A declaration that failed to parse
    Bad(&'ast BadDecl),
    /// A free-floating comment
    Comment(&'ast CommentGroup<'ast>),
}

impl<'ast> Decl<'ast> {
    /// Source location.
    pub fn span(&self) -> Span {
        match self {
            Self::Field(d) => d.span,
            Self::Alias(d) => d.span,
            Self::Comprehension(d) => d.span,
            Self::Emit(d) => d.span,
            Self::Import(d) => d.span,
            Self::Bad(d) => d.span,
            Self::Comment(d) => d.span,
        }
    }
}

/// A field declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'ast> {
    pub id: NodeId,
    pub label: Label<'ast>,
    /// Position of `?` for optional fields.
    pub optional: Option<Span>,
    pub value: Expr<'ast>,
    pub attrs: &'ast [Attribute<'ast>],
    pub comments: &'ast [&'ast CommentGroup<'ast>],
    pub span: Span,
}

impl<'ast> Field<'ast> {
    /// The comment group placed before the field, if any.
    pub fn doc(&self) -> Option<&'ast CommentGroup<'ast>> {
        self.comments.iter().copied().find(|c| c.position == 0)
    }
}

/// A field label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Label<'ast> {
    /// `foo: v`
    Ident(&'ast Ident<'ast>),
    /// `"foo": v`, or any other literal the parser accepted.
    Lit(&'ast BasicLit<'ast>),
    /// `"\(x)": v`
    Interpolation(&'ast Interpolation<'ast>),
    /// `[X]: v`
    Template(&'ast TemplateLabel<'ast>),
}

impl<'ast> Label<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Ident(l) => l.span,
            Self::Lit(l) => l.span,
            Self::Interpolation(l) => l.span,
            Self::Template(l) => l.span,
        }
    }
}

/// `[X]` in `[X]: v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateLabel<'ast> {
    pub id: NodeId,
    pub ident: &'ast Ident<'ast>,
    pub span: Span,
}

/// An attribute such as `@go(Name)`, kept as raw text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribute<'ast> {
    pub text: &'ast str,
    pub span: Span,
}

/// A group of adjacent comment lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommentGroup<'ast> {
    /// Where the group sits relative to its node; 0 means before it.
    pub position: u8,
    /// Comment lines with the comment markers stripped.
    pub lines: &'ast [&'ast str],
    pub span: Span,
}

impl<'ast> CommentGroup<'ast> {
    /// The comment text, one line per comment line.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// `X = expr`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alias<'ast> {
    pub id: NodeId,
    pub ident: &'ast Ident<'ast>,
    pub expr: Expr<'ast>,
    pub span: Span,
}

/// A field produced by clauses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComprehensionDecl<'ast> {
    pub id: NodeId,
    pub field: &'ast Field<'ast>,
    pub clauses: &'ast [Clause<'ast>],
    pub span: Span,
}

/// A bare expression emitted as the file's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitDecl<'ast> {
    pub id: NodeId,
    pub expr: Expr<'ast>,
    pub span: Span,
}

/// `import ( ... )`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportDecl<'ast> {
    pub id: NodeId,
    pub specs: &'ast [&'ast ImportSpec<'ast>],
    pub span: Span,
}

/// One imported path, optionally renamed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportSpec<'ast> {
    pub id: NodeId,
    pub name: Option<&'ast Ident<'ast>>,
    pub path: &'ast BasicLit<'ast>,
    pub span: Span,
}

/// A declaration that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadDecl {
    pub id: NodeId,
    pub span: Span,
}
