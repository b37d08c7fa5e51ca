//! Arena allocation of syntax nodes.
//!
//! [`AstBuilder`] hands out a fresh [`NodeId`] for every node it allocates.
//! Nodes that must be referenced before they exist (the record a field
//! reference points into, a `for` clause whose variables appear in the
//! yielded value, a template field) can have their id reserved up front
//! with [`AstBuilder::reserve`].

use std::cell::Cell;

use bumpalo::Bump;
use lattice_core::{NodeId, Span};

use crate::ast::*;

/// Allocates syntax nodes in a [`Bump`] arena.
///
/// Unless a position is set with [`AstBuilder::at`], each node gets a
/// synthetic position on line 1 whose column is its id plus one, so that
/// distinct nodes have distinct positions.
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    next_id: Cell<u32>,
    pos: Cell<Option<Span>>,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            next_id: Cell::new(0),
            pos: Cell::new(None),
        }
    }

    /// The arena nodes are allocated in.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    /// Reserve an id for a node that is allocated later.
    pub fn reserve(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId::new(id)
    }

    /// Use `span` as the position of the next allocated node.
    pub fn at(&self, span: Span) -> &Self {
        self.pos.set(Some(span));
        self
    }

    fn span_for(&self, id: NodeId) -> Span {
        self.pos
            .take()
            .unwrap_or_else(|| Span::new(1, id.index() + 1, 1))
    }

    fn next(&self) -> (NodeId, Span) {
        let id = self.reserve();
        (id, self.span_for(id))
    }

    fn alloc<T>(&self, node: T) -> &'ast T {
        self.arena.alloc(node)
    }

    fn slice<T: Copy>(&self, items: &[T]) -> &'ast [T] {
        self.arena.alloc_slice_copy(items)
    }

    fn str(&self, s: &str) -> &'ast str {
        self.arena.alloc_str(s)
    }

    // ========================================================================
    // Files and declarations
    // ========================================================================

    pub fn file(&self, decls: &[Decl<'ast>]) -> &'ast File<'ast> {
        let id = self.reserve();
        self.file_with_id(id, decls)
    }

    /// A file whose id was reserved so top-level references can point at it.
    pub fn file_with_id(&self, id: NodeId, decls: &[Decl<'ast>]) -> &'ast File<'ast> {
        let span = self.span_for(id);
        self.alloc(File {
            id,
            decls: self.slice(decls),
            span,
        })
    }

    /// `label: value`
    pub fn field(&self, label: Label<'ast>, value: Expr<'ast>) -> Decl<'ast> {
        Decl::Field(self.field_decl(None, label, value, false, &[], &[]))
    }

    /// `label?: value`
    pub fn optional_field(&self, label: Label<'ast>, value: Expr<'ast>) -> Decl<'ast> {
        Decl::Field(self.field_decl(None, label, value, true, &[], &[]))
    }

    /// A field with every part spelled out. `attrs` are raw attribute texts
    /// such as `@go(Name)`; `doc` are the lines of a leading comment.
    pub fn field_decl(
        &self,
        id: Option<NodeId>,
        label: Label<'ast>,
        value: Expr<'ast>,
        optional: bool,
        attrs: &[&str],
        doc: &[&str],
    ) -> &'ast Field<'ast> {
        let id = id.unwrap_or_else(|| self.reserve());
        let span = self.span_for(id);
        let attrs: Vec<Attribute<'ast>> = attrs
            .iter()
            .map(|text| Attribute {
                text: self.str(text),
                span,
            })
            .collect();
        let comments: &'ast [&'ast CommentGroup<'ast>] = if doc.is_empty() {
            &[]
        } else {
            let group = self.comment_group(0, doc);
            self.slice(&[group])
        };
        self.alloc(Field {
            id,
            label,
            optional: optional.then_some(span),
            value,
            attrs: self.slice(&attrs),
            comments,
            span,
        })
    }

    /// `name = expr`
    pub fn alias(&self, name: &str, expr: Expr<'ast>) -> &'ast Alias<'ast> {
        let (id, span) = self.next();
        self.alloc(Alias {
            id,
            ident: self.ident(name),
            expr,
            span,
        })
    }

    /// A field declaration guarded by clauses.
    pub fn comprehension(&self, field: &'ast Field<'ast>, clauses: &[Clause<'ast>]) -> Decl<'ast> {
        let (id, span) = self.next();
        Decl::Comprehension(self.alloc(ComprehensionDecl {
            id,
            field,
            clauses: self.slice(clauses),
            span,
        }))
    }

    pub fn emit(&self, expr: Expr<'ast>) -> Decl<'ast> {
        let (id, span) = self.next();
        Decl::Emit(self.alloc(EmitDecl { id, expr, span }))
    }

    pub fn import(&self, specs: &[&'ast ImportSpec<'ast>]) -> Decl<'ast> {
        let (id, span) = self.next();
        Decl::Import(self.alloc(ImportDecl {
            id,
            specs: self.slice(specs),
            span,
        }))
    }

    /// `name "path"`, where `path` is the quoted source text.
    pub fn import_spec(&self, id: Option<NodeId>, name: Option<&str>, path: &str) -> &'ast ImportSpec<'ast> {
        let id = id.unwrap_or_else(|| self.reserve());
        let span = self.span_for(id);
        self.alloc(ImportSpec {
            id,
            name: name.map(|n| self.ident(n)),
            path: self.basic_lit(LitKind::String, path),
            span,
        })
    }

    pub fn bad_decl(&self) -> Decl<'ast> {
        let (id, span) = self.next();
        Decl::Bad(self.alloc(BadDecl { id, span }))
    }

    /// A free-floating comment.
    pub fn comment(&self, lines: &[&str]) -> Decl<'ast> {
        Decl::Comment(self.comment_group(1, lines))
    }

    fn comment_group(&self, position: u8, lines: &[&str]) -> &'ast CommentGroup<'ast> {
        let (_, span) = self.next();
        let lines: Vec<&'ast str> = lines.iter().map(|l| self.str(l)).collect();
        self.alloc(CommentGroup {
            position,
            lines: self.slice(&lines),
            span,
        })
    }

    // ========================================================================
    // Labels
    // ========================================================================

    /// An identifier label.
    pub fn label(&self, name: &str) -> Label<'ast> {
        Label::Ident(self.ident(name))
    }

    /// A quoted string label; `raw` includes the quotes.
    pub fn label_string(&self, raw: &str) -> Label<'ast> {
        Label::Lit(self.basic_lit(LitKind::String, raw))
    }

    /// A literal label of any kind.
    pub fn label_lit(&self, kind: LitKind, raw: &str) -> Label<'ast> {
        Label::Lit(self.basic_lit(kind, raw))
    }

    pub fn label_interpolation(&self, elts: &[Expr<'ast>]) -> Label<'ast> {
        Label::Interpolation(self.interpolation_node(elts))
    }

    /// `[name]`
    pub fn label_template(&self, name: &str) -> Label<'ast> {
        let (id, span) = self.next();
        Label::Template(self.alloc(TemplateLabel {
            id,
            ident: self.ident(name),
            span,
        }))
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// An identifier that name resolution left unbound.
    pub fn ident(&self, name: &str) -> &'ast Ident<'ast> {
        let (id, span) = self.next();
        self.alloc(Ident {
            id,
            name: self.str(name),
            resolution: None,
            span,
        })
    }

    /// An identifier bound by name resolution.
    pub fn resolved(&self, name: &str, resolution: Resolution<'ast>) -> &'ast Ident<'ast> {
        let (id, span) = self.next();
        self.alloc(Ident {
            id,
            name: self.str(name),
            resolution: Some(resolution),
            span,
        })
    }

    /// An unbound identifier expression.
    pub fn name(&self, name: &str) -> Expr<'ast> {
        Expr::Ident(self.ident(name))
    }

    /// A reference to field `name` of the record declared by `scope`.
    pub fn field_ref(&self, name: &str, scope: NodeId) -> Expr<'ast> {
        Expr::Ident(self.resolved(name, Resolution::Scope(scope)))
    }

    /// A reference to a name introduced directly by `node`.
    pub fn node_ref(&self, name: &str, node: NodeId) -> Expr<'ast> {
        Expr::Ident(self.resolved(name, Resolution::Node(node)))
    }

    /// A reference to an alias.
    pub fn alias_ref(&self, alias: &'ast Alias<'ast>) -> Expr<'ast> {
        Expr::Ident(self.resolved(alias.ident.name, Resolution::Alias(alias)))
    }

    // ========================================================================
    // Literals
    // ========================================================================

    pub fn basic_lit(&self, kind: LitKind, raw: &str) -> &'ast BasicLit<'ast> {
        let (id, span) = self.next();
        self.alloc(BasicLit {
            id,
            kind,
            value: self.str(raw),
            span,
        })
    }

    pub fn lit(&self, kind: LitKind, raw: &str) -> Expr<'ast> {
        Expr::BasicLit(self.basic_lit(kind, raw))
    }

    pub fn int(&self, raw: &str) -> Expr<'ast> {
        self.lit(LitKind::Int, raw)
    }

    pub fn float(&self, raw: &str) -> Expr<'ast> {
        self.lit(LitKind::Float, raw)
    }

    /// A string or bytes literal; `raw` includes the quotes.
    pub fn string(&self, raw: &str) -> Expr<'ast> {
        self.lit(LitKind::String, raw)
    }

    pub fn null(&self) -> Expr<'ast> {
        self.lit(LitKind::Null, "null")
    }

    pub fn bool(&self, b: bool) -> Expr<'ast> {
        if b {
            self.lit(LitKind::True, "true")
        } else {
            self.lit(LitKind::False, "false")
        }
    }

    /// `_|_`
    pub fn bottom(&self) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Bottom(self.alloc(BottomLit { id, span }))
    }

    pub fn bad(&self) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Bad(self.alloc(BadExpr { id, span }))
    }

    /// String interpolation parts: literal fragments (quoted source text)
    /// alternating with expressions.
    pub fn interpolation(&self, elts: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Interpolation(self.interpolation_node(elts))
    }

    fn interpolation_node(&self, elts: &[Expr<'ast>]) -> &'ast Interpolation<'ast> {
        let (id, span) = self.next();
        self.alloc(Interpolation {
            id,
            elts: self.slice(elts),
            span,
        })
    }

    // ========================================================================
    // Composite literals
    // ========================================================================

    /// `{ decls }`
    pub fn struct_lit(&self, decls: &[Decl<'ast>]) -> Expr<'ast> {
        let id = self.reserve();
        self.struct_lit_with_id(id, decls)
    }

    /// A record literal whose id was reserved so its fields can be referenced
    /// from inside it.
    pub fn struct_lit_with_id(&self, id: NodeId, decls: &[Decl<'ast>]) -> Expr<'ast> {
        let span = self.span_for(id);
        Expr::Struct(self.alloc(StructLit {
            id,
            lbrace: Some(span),
            elts: self.slice(decls),
            span,
        }))
    }

    /// The brace-less single-field form, as in `a b: 1`.
    pub fn sugar_struct(&self, decl: Decl<'ast>) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Struct(self.alloc(StructLit {
            id,
            lbrace: None,
            elts: self.slice(&[decl]),
            span,
        }))
    }

    /// `[ elts ]`
    pub fn list(&self, elts: &[Expr<'ast>]) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::List(self.alloc(ListLit {
            id,
            elts: self.slice(elts),
            ellipsis: None,
            typ: None,
            span,
        }))
    }

    /// `[ elts, ...typ ]`
    pub fn open_list(&self, elts: &[Expr<'ast>], typ: Option<Expr<'ast>>) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::List(self.alloc(ListLit {
            id,
            elts: self.slice(elts),
            ellipsis: Some(span),
            typ,
            span,
        }))
    }

    pub fn list_comprehension(&self, expr: Expr<'ast>, clauses: &[Clause<'ast>]) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::ListComprehension(self.alloc(ListComprehension {
            id,
            expr,
            clauses: self.slice(clauses),
            span,
        }))
    }

    // ========================================================================
    // Clauses
    // ========================================================================

    /// `for key, value in source`. Pass a reserved id when the loop
    /// variables are referenced.
    pub fn for_clause(
        &self,
        id: Option<NodeId>,
        key: Option<&str>,
        value: &str,
        source: Expr<'ast>,
    ) -> Clause<'ast> {
        let id = id.unwrap_or_else(|| self.reserve());
        let span = self.span_for(id);
        Clause::For(self.alloc(ForClause {
            id,
            key: key.map(|k| self.ident(k)),
            value: self.ident(value),
            source,
            span,
        }))
    }

    pub fn if_clause(&self, condition: Expr<'ast>) -> Clause<'ast> {
        let (id, span) = self.next();
        Clause::If(self.alloc(IfClause {
            id,
            condition,
            span,
        }))
    }

    // ========================================================================
    // Operators and access
    // ========================================================================

    pub fn paren(&self, x: Expr<'ast>) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Paren(self.alloc(ParenExpr { id, x, span }))
    }

    /// `x.name`
    pub fn selector(&self, x: Expr<'ast>, name: &str) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Selector(self.alloc(SelectorExpr {
            id,
            x,
            sel: self.ident(name),
            span,
        }))
    }

    pub fn index(&self, x: Expr<'ast>, index: Expr<'ast>) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Index(self.alloc(IndexExpr { id, x, index, span }))
    }

    pub fn slice_expr(&self, x: Expr<'ast>, low: Option<Expr<'ast>>, high: Option<Expr<'ast>>) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Slice(self.alloc(SliceExpr {
            id,
            x,
            low,
            high,
            span,
        }))
    }

    pub fn call(&self, fun: Expr<'ast>, args: &[Expr<'ast>]) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Call(self.alloc(CallExpr {
            id,
            fun,
            args: self.slice(args),
            span,
        }))
    }

    pub fn unary(&self, op: Token, x: Expr<'ast>) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Unary(self.alloc(UnaryExpr { id, op, x, span }))
    }

    pub fn binary(&self, op: Token, x: Expr<'ast>, y: Expr<'ast>) -> Expr<'ast> {
        let (id, span) = self.next();
        Expr::Binary(self.alloc(BinaryExpr { id, op, x, y, span }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_reservable() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let scope = b.reserve();
        let x = b.field_ref("x", scope);
        let s = b.struct_lit_with_id(scope, &[b.field(b.label("x"), b.int("1"))]);

        assert_eq!(s.id(), scope);
        assert_ne!(x.id(), scope);
        match x {
            Expr::Ident(ident) => assert_eq!(ident.resolution, Some(Resolution::Scope(scope))),
            _ => panic!("expected identifier"),
        }
    }

    #[test]
    fn synthetic_positions_are_distinct() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let one = b.int("1");
        let two = b.int("2");
        assert_ne!(one.span(), two.span());
        assert!(one.span().is_valid());
    }

    #[test]
    fn explicit_position_applies_to_next_node_only() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let pos = Span::new(7, 3, 4);
        let first = b.at(pos).name("foo");
        let second = b.name("bar");
        assert_eq!(first.span(), pos);
        assert_ne!(second.span(), pos);
    }

    #[test]
    fn field_doc_and_attributes() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let field = b.field_decl(None, b.label("a"), b.int("1"), true, &["@go(A)"], &["the a field"]);
        assert!(field.optional.is_some());
        assert_eq!(field.attrs[0].text, "@go(A)");
        assert_eq!(field.doc().map(|d| d.text()), Some("the a field".to_string()));

        let bare = b.field(b.label("b"), b.int("2"));
        let Decl::Field(bare) = bare else { panic!("expected field") };
        assert!(bare.doc().is_none());
    }

    #[test]
    fn file_lists_imports() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let spec = b.import_spec(None, None, "\"strings\"");
        let file = b.file(&[b.import(&[spec]), b.field(b.label("a"), b.int("1"))]);
        assert_eq!(file.imports().count(), 1);
    }
}
