//! Arena of records, lambdas and packages.
//!
//! Graph nodes that can be referenced before they are complete live here and
//! are addressed by [`ScopeId`]. An arena slot is allocated once and filled
//! in place as lowering proceeds; it is never moved or replaced by a node of
//! another shape.

use crate::{ScopeId, Span};

use super::{LambdaExpr, StructLit, Value};

/// One arena slot.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphNode {
    Struct(StructLit),
    Lambda(LambdaExpr),
    /// The root value of an imported or builtin package.
    Package(Package),
}

/// A resolved import.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub src: Option<Span>,
    pub path: String,
    pub value: Value,
}

/// The node arena of one compilation context.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a slot.
    pub fn alloc(&mut self, node: GraphNode) -> ScopeId {
        let id = ScopeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate an empty record.
    pub fn alloc_struct(&mut self, src: Option<Span>) -> ScopeId {
        self.alloc(GraphNode::Struct(StructLit::new(src)))
    }

    /// Allocate a lambda without parameters or body.
    pub fn alloc_lambda(&mut self, src: Option<Span>) -> ScopeId {
        self.alloc(GraphNode::Lambda(LambdaExpr {
            src,
            ..LambdaExpr::default()
        }))
    }

    /// The node at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this graph.
    pub fn get(&self, id: ScopeId) -> &GraphNode {
        &self.nodes[id.index() as usize]
    }

    /// The node at `id`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this graph.
    pub fn get_mut(&mut self, id: ScopeId) -> &mut GraphNode {
        &mut self.nodes[id.index() as usize]
    }

    /// The record at `id`, if the slot holds one.
    pub fn as_struct(&self, id: ScopeId) -> Option<&StructLit> {
        match self.nodes.get(id.index() as usize) {
            Some(GraphNode::Struct(s)) => Some(s),
            _ => None,
        }
    }

    /// The record at `id`.
    ///
    /// # Panics
    ///
    /// Panics if the slot does not hold a record.
    pub fn struct_at(&self, id: ScopeId) -> &StructLit {
        match self.get(id) {
            GraphNode::Struct(s) => s,
            other => panic!("{id} is not a struct: {other:?}"),
        }
    }

    /// The record at `id`.
    ///
    /// # Panics
    ///
    /// Panics if the slot does not hold a record. Callers only use ids they
    /// allocated as records.
    pub fn struct_mut(&mut self, id: ScopeId) -> &mut StructLit {
        match self.get_mut(id) {
            GraphNode::Struct(s) => s,
            other => panic!("{id} is not a struct: {other:?}"),
        }
    }

    /// The lambda at `id`, if the slot holds one.
    pub fn as_lambda(&self, id: ScopeId) -> Option<&LambdaExpr> {
        match self.nodes.get(id.index() as usize) {
            Some(GraphNode::Lambda(l)) => Some(l),
            _ => None,
        }
    }

    /// The lambda at `id`.
    ///
    /// # Panics
    ///
    /// Panics if the slot does not hold a lambda.
    pub fn lambda_mut(&mut self, id: ScopeId) -> &mut LambdaExpr {
        match self.get_mut(id) {
            GraphNode::Lambda(l) => l,
            other => panic!("{id} is not a lambda: {other:?}"),
        }
    }

    /// Number of allocated slots.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
