//! Instance API.
//!
//! An [`Instance`] owns the value graph of one package. Files are lowered
//! into its root record one at a time; every file sees the fields the
//! previous ones declared through the shared root.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use lattice::Instance;
//! use lattice::syntax::AstBuilder;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let file = b.file(&[b.field(b.label("port"), b.int("8080"))]);
//!
//! let mut inst = Instance::new();
//! inst.insert_file(file).unwrap();
//! assert!(inst.diagnostics().is_empty());
//! assert_eq!(inst.root_struct().arcs.len(), 1);
//! ```

use lattice_compiler::{BuildOptions, GraphBuilder, ImportResolver, NoImports};
use lattice_core::adt::{Graph, StructLit, Value};
use lattice_core::{Bottom, ErrorList, LabelTable, ScopeId};
use lattice_syntax::{Expr, File};

/// The value graph of one package.
#[derive(Debug)]
pub struct Instance<R: ImportResolver = NoImports> {
    graph: Graph,
    labels: LabelTable,
    /// The record all files are merged into.
    root: ScopeId,
    /// Record of names visible to every file without being declared in it.
    scope: Option<ScopeId>,
    resolver: R,
    options: BuildOptions,
    /// Diagnostics of every build so far, in build order.
    diagnostics: ErrorList,
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

impl Instance {
    /// An empty instance that resolves no imports.
    pub fn new() -> Self {
        Self::with_resolver(NoImports)
    }
}

impl<R: ImportResolver> Instance<R> {
    /// An empty instance resolving imports through `resolver`.
    pub fn with_resolver(resolver: R) -> Self {
        let mut graph = Graph::new();
        let root = graph.alloc_struct(None);
        Self {
            graph,
            labels: LabelTable::new(),
            root,
            scope: None,
            resolver,
            options: BuildOptions::default(),
            diagnostics: ErrorList::new(),
        }
    }

    /// Use `options` for subsequent builds.
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Lower `file` into the root record.
    ///
    /// Failures inside the file are recorded in [`diagnostics`] and do not
    /// fail the insertion unless the file as a whole lowers to a bottom.
    ///
    /// # Errors
    ///
    /// Returns the diagnostics of this file if the result is a bottom, or
    /// the bottom itself if no diagnostic was recorded.
    ///
    /// [`diagnostics`]: Instance::diagnostics
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn insert_file(&mut self, file: &File<'_>) -> Result<(), BuildError> {
        let mut builder = GraphBuilder::new(
            &mut self.graph,
            &mut self.labels,
            &self.resolver,
            self.options,
        );
        if let Some(scope) = self.scope {
            builder = builder.with_resolve_root(scope);
        }
        let value = builder.lower_file(file, self.root);
        let errors = builder.finish();
        self.record(&errors);

        match value.as_bottom() {
            None => Ok(()),
            Some(_) if !errors.is_empty() => Err(BuildError::Diagnostics(errors)),
            Some(bottom) => Err(BuildError::Bottom(bottom.clone())),
        }
    }

    /// Lower an expression in the context of the root record: unbound
    /// identifiers resolve to root fields.
    pub fn lower_expr(&mut self, expr: &Expr<'_>) -> Value {
        let mut builder = GraphBuilder::new(
            &mut self.graph,
            &mut self.labels,
            &self.resolver,
            self.options,
        )
        .with_resolve_root(self.root);
        let value = builder.lower_expr(expr);
        let errors = builder.finish();
        self.record(&errors);
        value
    }

    /// The record of names visible to every subsequently inserted file,
    /// created on first use.
    pub fn scope_mut(&mut self) -> &mut StructLit {
        let scope = match self.scope {
            Some(scope) => scope,
            None => {
                let scope = self.graph.alloc_struct(None);
                self.scope = Some(scope);
                scope
            }
        };
        self.graph.struct_mut(scope)
    }

    fn record(&mut self, errors: &ErrorList) {
        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "build reported diagnostics");
        }
        self.diagnostics = ErrorList::append(&self.diagnostics, errors);
    }

    /// Diagnostics of every build so far.
    pub fn diagnostics(&self) -> &ErrorList {
        &self.diagnostics
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Mutable label table, for interning names ahead of a build.
    pub fn labels_mut(&mut self) -> &mut LabelTable {
        &mut self.labels
    }

    /// Arena id of the root record.
    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn root_struct(&self) -> &StructLit {
        self.graph.struct_at(self.root)
    }
}

/// Errors returned by [`Instance::insert_file`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    /// The file failed and these diagnostics explain why.
    #[error("{0}")]
    Diagnostics(ErrorList),

    /// The file failed without a recorded diagnostic.
    #[error("{}", .0.message())]
    Bottom(Bottom),
}
