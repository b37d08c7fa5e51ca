//! Syntax node to graph node map.
//!
//! Every build keeps one [`ScopeMap`]. A reference to a record that is still
//! being lowered (or not lowered yet) asks for the record's graph node with
//! [`ScopeMap::map_scope`] and gets a stable placeholder that the record's
//! own lowering later fills in. Nodes that lower to something other than a
//! record (`for` clauses and templates lower to lambdas, import specs to
//! packages) are registered with [`ScopeMap::set_scope`] before any
//! reference to them can be lowered.

use lattice_core::adt::Graph;
use lattice_core::{NodeId, ScopeId};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct ScopeMap {
    map: FxHashMap<NodeId, ScopeId>,
}

impl ScopeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The graph node for `node`, allocating an empty record on first use.
    pub fn map_scope(&mut self, graph: &mut Graph, node: NodeId) -> ScopeId {
        *self.map.entry(node).or_insert_with(|| {
            let id = graph.alloc_struct(None);
            tracing::trace!(%node, scope = %id, "allocated placeholder record");
            id
        })
    }

    /// Bind `node` to `scope`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is already bound to a different scope.
    pub fn set_scope(&mut self, node: NodeId, scope: ScopeId) {
        if let Some(&prev) = self.map.get(&node)
            && prev != scope
        {
            panic!("{node} already defined as {prev}, cannot redefine as {scope}");
        }
        self.map.insert(node, scope);
    }

    /// The scope bound to `node`, without allocating.
    pub fn get(&self, node: NodeId) -> Option<ScopeId> {
        self.map.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
