//! List literals.
//!
//! A list is a record with positional arcs plus a length and an element
//! constraint. Closed lists have an exact length and a top element type;
//! an ellipsis (or a trailing type) makes the length a `>=` bound.

use lattice_core::adt::{Arc, Attrs, Bound, ListLit, Num, StructLit, Value, ValueKind};
use lattice_core::{Feature, Kind, Op};
use lattice_syntax::ast;

use super::{GraphBuilder, errf};

pub(super) fn lower_list(b: &mut GraphBuilder<'_>, l: &ast::ListLit<'_>) -> Value {
    b.push_path();
    let mut elems = StructLit::new(Some(l.span));
    for (i, elt) in l.elts.iter().enumerate() {
        b.set_sel(i.to_string());
        let Some(feature) = Feature::from_index(i) else {
            let err = errf!(b, elt.span(), "list index {i} out of range");
            b.pop_path();
            return err;
        };
        let value = b.lower_expr(elt);
        elems.arcs.push(Arc {
            feature,
            value,
            optional: false,
            attrs: Attrs::default(),
            docs: Vec::new(),
        });
    }

    let mut len = Value::new(
        Some(l.span),
        ValueKind::Num(Num::Int(l.elts.len() as u128)),
    );
    let mut typ = Value::top();
    if l.ellipsis.is_some() || l.typ.is_some() {
        len = Value::new(
            l.ellipsis.or(Some(l.span)),
            ValueKind::Bound(Box::new(Bound {
                op: Op::GreaterEqual,
                kind: Kind::INT,
                value: len,
            })),
        );
        if let Some(t) = &l.typ {
            b.set_sel("...");
            typ = b.lower_expr(t);
        }
    }
    b.pop_path();

    Value::new(
        Some(l.span),
        ValueKind::List(Box::new(ListLit { elems, len, typ })),
    )
}
