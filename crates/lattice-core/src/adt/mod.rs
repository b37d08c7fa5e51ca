//! The internal value graph produced by lowering and consumed by the
//! evaluator.

mod graph;
mod value;
mod vertex;

pub use graph::{Graph, GraphNode, Package};
pub use value::{
    Arc, Attr, Attrs, Bound, Builtin, DValue, Disjunction, DocComment, FieldComprehension,
    LambdaExpr, ListLit, Num, Param, SliceExpr, StructLit, Value, ValueKind, Yield, is_error,
};
pub use vertex::{Vertex, Vertices, is_incomplete};
