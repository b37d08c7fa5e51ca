//! User-facing error construction.
//!
//! [`OpContext`] knows where evaluation currently is (a vertex and a source
//! position) and turns a message into a [`ValueError`] carrying that position
//! and the field path from the root to the vertex.

use std::fmt;

use crate::adt::Vertices;
use crate::{Bottom, ErrorCode, LabelTable, Span, ValueError, VertexId};

/// Context for creating positioned errors.
#[derive(Debug, Clone, Copy)]
pub struct OpContext<'a> {
    labels: &'a LabelTable,
    vertices: &'a Vertices,
    vertex: Option<VertexId>,
    pos: Option<Span>,
}

impl<'a> OpContext<'a> {
    /// A context with no current vertex or position.
    pub fn new(labels: &'a LabelTable, vertices: &'a Vertices) -> Self {
        Self {
            labels,
            vertices,
            vertex: None,
            pos: None,
        }
    }

    /// Move to `vertex`.
    pub fn at_vertex(mut self, vertex: VertexId) -> Self {
        self.vertex = Some(vertex);
        self
    }

    /// Set the current source position.
    pub fn at_pos(mut self, pos: Option<Span>) -> Self {
        self.pos = pos;
        self
    }

    /// The current source position.
    pub fn pos(&self) -> Option<Span> {
        self.pos
    }

    /// An error at the current position.
    pub fn new_error(&self, args: fmt::Arguments<'_>) -> ValueError {
        self.new_at(self.pos, args)
    }

    /// An error at `pos`.
    pub fn new_at(&self, pos: Option<Span>, args: fmt::Arguments<'_>) -> ValueError {
        ValueError::new(args.to_string(), pos.into_iter().collect(), self.path())
    }

    /// A bottom with `code` at the current position.
    pub fn mk_err(&self, code: ErrorCode, args: fmt::Arguments<'_>) -> Bottom {
        Bottom::with_errors(code, self.new_error(args).into()).at(self.pos)
    }

    /// The selectors from the root to the current vertex.
    pub fn path(&self) -> Vec<String> {
        let Some(vertex) = self.vertex else {
            return Vec::new();
        };
        self.vertices
            .path(vertex)
            .into_iter()
            .map(|f| f.selector_string(self.labels))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Feature;
    use crate::adt::Value;

    #[test]
    fn error_without_position() {
        let labels = LabelTable::new();
        let vertices = Vertices::new();
        let ctx = OpContext::new(&labels, &vertices);
        let err = ctx.new_error(format_args!("value {} missing", 3));
        assert_eq!(err.message(), "value 3 missing");
        assert_eq!(err.position(), None);
        assert!(err.path().is_empty());
    }

    #[test]
    fn error_path_renders_selectors() {
        let mut labels = LabelTable::new();
        let a = labels.label("a");
        let mut vertices = Vertices::new();
        let root = vertices.add_root(Value::top());
        let va = vertices.add_arc(root, a, Value::top());
        let tmpl = vertices.add_arc(va, Feature::TEMPLATE, Value::top());
        let elem = vertices.add_arc(tmpl, Feature::from_index(1).unwrap(), Value::top());
        let computed = vertices.add_arc(elem, Feature::COMPUTED, Value::top());

        let pos = Some(Span::new(2, 3, 1));
        let ctx = OpContext::new(&labels, &vertices)
            .at_vertex(computed)
            .at_pos(pos);
        let err = ctx.new_error(format_args!("conflict"));
        assert_eq!(err.path(), ["a", "*", "1", "?"]);
        assert_eq!(err.position(), pos);

        let other = Some(Span::new(9, 1, 1));
        let err = ctx.new_at(other, format_args!("elsewhere"));
        assert_eq!(err.input_positions(), [other.unwrap()]);
    }

    #[test]
    fn mk_err_sets_code_and_source() {
        let labels = LabelTable::new();
        let vertices = Vertices::new();
        let pos = Some(Span::new(1, 1, 1));
        let ctx = OpContext::new(&labels, &vertices).at_pos(pos);
        let b = ctx.mk_err(ErrorCode::IncompleteError, format_args!("not yet"));
        assert_eq!(b.code, ErrorCode::IncompleteError);
        assert_eq!(b.src, pos);
        assert_eq!(b.message(), "not yet");
    }
}
