//! Lowering of syntax trees into the value graph.
//!
//! [`GraphBuilder`] walks a file top-down and turns every syntax node into
//! exactly one [`Value`]. A node that cannot be lowered becomes a [`Bottom`]
//! in place and the same failure is appended to the build's diagnostics, so
//! that a broken field is reported even when the enclosing record lowers
//! fine.
//!
//! ## Submodules
//!
//! - `decls`: files, record bodies, fields and field comprehensions
//! - `lists`: list literals
//! - `identifiers`: identifier resolution, builtins and predefined bounds
//! - `literals`: basic literals and string interpolation
//! - `operators`: unary and binary operators
//! - `access`: selectors, indexing, slicing and calls
//! - `disjunction`: flattening of `|` chains
//! - `comprehension`: `for`/`if` clause desugaring
//! - `imports`: import declarations

mod access;
mod comprehension;
mod decls;
mod disjunction;
mod identifiers;
mod imports;
mod literals;
mod lists;
mod operators;

use std::fmt;

use lattice_core::adt::{DocComment, Graph, Value, ValueKind};
use lattice_core::{
    Bottom, ErrorCode, ErrorList, Feature, LabelTable, NodeId, ScopeId, Span, ValueError,
};
use lattice_syntax::ast::{Expr, File};
use rustc_hash::FxHashMap;

use crate::options::BuildOptions;
use crate::resolver::ImportResolver;
use crate::scope::ScopeMap;

/// Record a diagnostic at a span and produce the matching bottom value.
macro_rules! errf {
    ($b:expr, $span:expr, $($arg:tt)*) => {
        $b.errf($span, format_args!($($arg)*))
    };
}
pub(crate) use errf;

/// Lowers one build into a [`Graph`].
///
/// A builder is created per build and discarded afterwards; the graph and
/// label table it writes to outlive it.
pub struct GraphBuilder<'a> {
    graph: &'a mut Graph,
    labels: &'a mut LabelTable,
    resolver: &'a dyn ImportResolver,
    options: BuildOptions,
    scopes: ScopeMap,
    /// Record consulted first when resolving unbound identifiers.
    resolve_root: Option<ScopeId>,
    errors: ErrorList,
    /// One selector slot per enclosing record or list body.
    path: Vec<Option<String>>,
    /// Documentation waiting to be attached to the next field.
    doc: Option<DocComment>,
    in_selector: u32,
    shorthands: FxHashMap<String, ScopeId>,
    /// Aliases currently being expanded.
    expanding: Vec<NodeId>,
    /// Lowered alias expressions, shared by every reference.
    aliases: FxHashMap<NodeId, Value>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        graph: &'a mut Graph,
        labels: &'a mut LabelTable,
        resolver: &'a dyn ImportResolver,
        options: BuildOptions,
    ) -> Self {
        Self {
            graph,
            labels,
            resolver,
            options,
            scopes: ScopeMap::new(),
            resolve_root: None,
            errors: ErrorList::new(),
            path: Vec::new(),
            doc: None,
            in_selector: 0,
            shorthands: FxHashMap::default(),
            expanding: Vec::new(),
            aliases: FxHashMap::default(),
        }
    }

    /// Resolve unbound identifiers against the fields of `scope` before
    /// falling back to builtins.
    pub fn with_resolve_root(mut self, scope: ScopeId) -> Self {
        self.resolve_root = Some(scope);
        self
    }

    /// Lower `file` into the record `into` and return the record value.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn lower_file(&mut self, file: &File<'_>, into: ScopeId) -> Value {
        tracing::debug!(file = %file.id, decls = file.decls.len(), "lowering file");
        self.scopes.set_scope(file.id, into);
        let value = decls::lower_file(self, file, into);
        tracing::debug!(
            file = %file.id,
            diagnostics = self.errors.len(),
            "lowered file"
        );
        value
    }

    /// Lower a single expression.
    pub fn lower_expr(&mut self, expr: &Expr<'_>) -> Value {
        match *expr {
            Expr::Ident(ident) => identifiers::lower_ident(self, ident),
            Expr::BasicLit(lit) => literals::lower_basic_lit(self, lit),
            Expr::Bottom(b) => Bottom::new(ErrorCode::UserError, "from source")
                .at(Some(b.span))
                .into(),
            Expr::Bad(b) => errf!(self, b.span, "invalid expression"),
            Expr::Struct(s) => decls::lower_struct(self, s),
            Expr::List(l) => lists::lower_list(self, l),
            Expr::ListComprehension(lc) => comprehension::lower_list_comprehension(self, lc),
            Expr::Interpolation(i) => literals::lower_interpolation(self, i),
            Expr::Paren(p) => self.lower_expr(&p.x),
            Expr::Selector(s) => access::lower_selector(self, s),
            Expr::Index(i) => access::lower_index(self, i),
            Expr::Slice(s) => access::lower_slice(self, s),
            Expr::Call(c) => access::lower_call(self, c),
            Expr::Unary(u) => operators::lower_unary(self, u),
            Expr::Binary(b) => operators::lower_binary(self, b),
        }
    }

    /// Diagnostics recorded so far.
    pub fn errors(&self) -> &ErrorList {
        &self.errors
    }

    /// Finish the build, returning its diagnostics.
    pub fn finish(self) -> ErrorList {
        self.errors
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    fn label(&mut self, name: &str) -> Feature {
        self.labels.label(name)
    }

    fn map_scope(&mut self, node: NodeId) -> ScopeId {
        self.scopes.map_scope(self.graph, node)
    }

    /// Record a diagnostic at `src` and return an evaluation-error bottom
    /// carrying the same message.
    fn errf(&mut self, src: Span, args: fmt::Arguments<'_>) -> Value {
        let err = ValueError::new(args.to_string(), vec![src], self.current_path());
        self.errors.push(err.clone());
        Bottom::with_errors(ErrorCode::EvalError, err.into())
            .at(Some(src))
            .into()
    }

    fn current_path(&self) -> Vec<String> {
        self.path
            .iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect()
    }

    fn push_path(&mut self) {
        self.path.push(None);
    }

    fn pop_path(&mut self) {
        self.path.pop();
    }

    /// Set the selector of the innermost body.
    fn set_sel(&mut self, sel: impl Into<String>) {
        if let Some(slot) = self.path.last_mut() {
            *slot = Some(sel.into());
        }
    }
}

/// A string value at `src`.
fn string_value(src: Span, s: impl Into<String>) -> Value {
    Value::new(Some(src), ValueKind::String(s.into()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::resolver::NoImports;
    use lattice_core::adt::StructLit;

    /// Graph, labels and diagnostics of a finished build.
    pub struct Built {
        pub graph: Graph,
        pub labels: LabelTable,
        pub root: ScopeId,
        pub value: Value,
        pub errors: ErrorList,
    }

    impl Built {
        pub fn root(&self) -> &StructLit {
            self.graph.as_struct(self.root).unwrap()
        }

        pub fn field(&self, name: &str) -> &Value {
            let f = self.labels.lookup(name).unwrap();
            &self.root().lookup(f).unwrap().value
        }

        pub fn record(&self, v: &Value) -> &StructLit {
            match v.kind {
                ValueKind::Struct(id) => self.graph.as_struct(id).unwrap(),
                _ => panic!("not a record: {v:?}"),
            }
        }
    }

    pub fn build(file: &File<'_>) -> Built {
        build_with(file, &NoImports, BuildOptions::default())
    }

    pub fn build_with(file: &File<'_>, resolver: &dyn ImportResolver, options: BuildOptions) -> Built {
        let mut graph = Graph::new();
        let mut labels = LabelTable::new();
        let root = graph.alloc_struct(None);
        let mut builder = GraphBuilder::new(&mut graph, &mut labels, resolver, options);
        let value = builder.lower_file(file, root);
        let errors = builder.finish();
        Built {
            graph,
            labels,
            root,
            value,
            errors,
        }
    }

    /// Lower a lone expression with no enclosing file.
    pub fn lower(expr: &Expr<'_>) -> (Value, ErrorList) {
        let mut graph = Graph::new();
        let mut labels = LabelTable::new();
        let mut builder = GraphBuilder::new(&mut graph, &mut labels, &NoImports, BuildOptions::default());
        let value = builder.lower_expr(expr);
        (value, builder.finish())
    }
}
