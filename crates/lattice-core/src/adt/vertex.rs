//! Evaluator-side vertices and child-error aggregation.
//!
//! A [`Vertex`] is the resolved node for one graph position. The evaluator
//! creates it once per position and mutates it as children resolve. Failures
//! of descendants are folded into the ancestor through
//! [`Vertex::add_child_error`]; this is a plain call from child to parent,
//! not an unwinding mechanism, so partial results survive at the parent.
//!
//! Mutation goes through `&mut Vertex`. Sharing vertices across threads
//! requires the caller to serialize aggregation per vertex.

use crate::{Bottom, Feature, VertexId, bottom::combine_bottoms};

use super::{Value, ValueKind};

/// The resolved node for one graph position.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub parent: Option<VertexId>,
    /// Selector from the parent; absent for a root.
    pub label: Option<Feature>,
    /// The current value, possibly a bottom.
    pub value: Value,
    /// All bottoms of descendants seen so far.
    pub child_errors: Option<Bottom>,
    pub arcs: Vec<VertexId>,
}

impl Vertex {
    /// A vertex holding `value`.
    pub fn new(parent: Option<VertexId>, label: Option<Feature>, value: Value) -> Self {
        Self {
            parent,
            label,
            value,
            child_errors: None,
            arcs: Vec::new(),
        }
    }

    /// Record an error that occurred in one of the descendant arcs.
    ///
    /// Incomplete errors are only tracked in `child_errors`. A fatal error
    /// also turns the vertex's own value into a bottom carrying the worst
    /// code seen; if the value was not an error yet, it is kept inside the
    /// new bottom for reference.
    pub fn add_child_error(&mut self, recursive: &Bottom) {
        self.child_errors = combine_bottoms(None, self.child_errors.as_ref(), Some(recursive));
        if recursive.is_incomplete() {
            return;
        }

        if let Some(err) = self.value.as_bottom_mut() {
            err.has_recursive = true;
            if err.code > recursive.code {
                err.code = recursive.code;
            }
            return;
        }

        let prev = std::mem::replace(&mut self.value, Value::top());
        let bottom = Bottom {
            src: None,
            err: recursive.err.clone(),
            code: recursive.code,
            has_recursive: true,
            child_error: true,
            value: Some(Box::new(prev)),
        };
        self.value = Value::new(None, ValueKind::Bottom(Box::new(bottom)));
    }
}

/// Reports whether `v` is absent or holds an incomplete error.
pub fn is_incomplete(v: Option<&Vertex>) -> bool {
    match v {
        None => true,
        Some(v) => v.value.as_bottom().is_some_and(Bottom::is_incomplete),
    }
}

/// Arena of vertices with parent links.
#[derive(Debug, Clone, Default)]
pub struct Vertices {
    nodes: Vec<Vertex>,
}

impl Vertices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root vertex.
    pub fn add_root(&mut self, value: Value) -> VertexId {
        self.push(Vertex::new(None, None, value))
    }

    /// Create a child of `parent` reached through `label`.
    pub fn add_arc(&mut self, parent: VertexId, label: Feature, value: Value) -> VertexId {
        let id = self.push(Vertex::new(Some(parent), Some(label), value));
        self.nodes[parent.index() as usize].arcs.push(id);
        id
    }

    pub fn get(&self, id: VertexId) -> Option<&Vertex> {
        self.nodes.get(id.index() as usize)
    }

    pub fn get_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.nodes.get_mut(id.index() as usize)
    }

    /// Labels from the root down to `id`.
    pub fn path(&self, id: VertexId) -> Vec<Feature> {
        let mut path = Vec::new();
        let mut cur = self.get(id);
        while let Some(v) = cur {
            if let Some(label) = v.label {
                path.push(label);
            }
            cur = v.parent.and_then(|p| self.get(p));
        }
        path.reverse();
        path
    }

    /// Fold the bottom held by `child` into every ancestor, innermost first.
    ///
    /// Nothing happens if the child's value is not a bottom.
    pub fn propagate_error(&mut self, child: VertexId) {
        let Some(err) = self.get(child).and_then(|v| v.value.as_bottom()).cloned() else {
            return;
        };
        let mut cur = self.get(child).and_then(|v| v.parent);
        while let Some(id) = cur {
            let v = &mut self.nodes[id.index() as usize];
            v.add_child_error(&err);
            cur = v.parent;
        }
    }

    fn push(&mut self, v: Vertex) -> VertexId {
        let id = VertexId::new(self.nodes.len() as u32);
        self.nodes.push(v);
        id
    }
}
