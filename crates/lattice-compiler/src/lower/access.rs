//! Selectors, indexing, slicing and calls.

use lattice_core::adt::{SliceExpr, Value, ValueKind};
use lattice_syntax::ast::{CallExpr, IndexExpr, SelectorExpr, SliceExpr as SliceSyntax};

use super::GraphBuilder;

/// `x.sel`
///
/// The operand is lowered in selector position, where a bare package name
/// may refer to a builtin package.
pub(super) fn lower_selector(b: &mut GraphBuilder<'_>, s: &SelectorExpr<'_>) -> Value {
    b.in_selector += 1;
    let x = b.lower_expr(&s.x);
    b.in_selector -= 1;
    let feature = b.label(s.sel.name);
    Value::new(Some(s.span), ValueKind::Selector(Box::new(x), feature))
}

pub(super) fn lower_index(b: &mut GraphBuilder<'_>, i: &IndexExpr<'_>) -> Value {
    let x = b.lower_expr(&i.x);
    let index = b.lower_expr(&i.index);
    Value::new(Some(i.span), ValueKind::Index(Box::new(x), Box::new(index)))
}

pub(super) fn lower_slice(b: &mut GraphBuilder<'_>, s: &SliceSyntax<'_>) -> Value {
    let x = b.lower_expr(&s.x);
    let lo = s.low.as_ref().map(|e| b.lower_expr(e));
    let hi = s.high.as_ref().map(|e| b.lower_expr(e));
    Value::new(
        Some(s.span),
        ValueKind::Slice(Box::new(SliceExpr { x, lo, hi })),
    )
}

pub(super) fn lower_call(b: &mut GraphBuilder<'_>, c: &CallExpr<'_>) -> Value {
    let fun = b.lower_expr(&c.fun);
    let args = c.args.iter().map(|a| b.lower_expr(a)).collect();
    Value::new(Some(c.span), ValueKind::Call(Box::new(fun), args))
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use lattice_core::adt::{Builtin, Num, ValueKind};
    use lattice_syntax::ast::AstBuilder;

    use crate::lower::test_support::{build, lower};

    #[test]
    fn selector_chain() {
        // a: { b: 1 }, c: a.b
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file_id = b.reserve();
        let file = b.file_with_id(
            file_id,
            &[
                b.field(b.label("a"), b.struct_lit(&[b.field(b.label("b"), b.int("1"))])),
                b.field(b.label("c"), b.selector(b.field_ref("a", file_id), "b")),
            ],
        );
        let built = build(file);
        assert!(built.errors.is_empty());

        let ValueKind::Selector(x, sel) = &built.field("c").kind else {
            panic!("expected selector");
        };
        assert_eq!(built.labels.name(*sel), Some("b"));
        let ValueKind::Selector(base, a) = &x.kind else {
            panic!("expected field reference");
        };
        assert_eq!(built.labels.name(*a), Some("a"));
        assert_eq!(base.kind, ValueKind::NodeRef(built.root));
    }

    #[test]
    fn index_and_slice() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let xs = b.list(&[b.int("1"), b.int("2")]);
        let (value, errors) = lower(&b.index(xs, b.int("0")));
        assert!(errors.is_empty());
        let ValueKind::Index(_, i) = value.kind else {
            panic!("expected index");
        };
        assert_eq!(i.kind, ValueKind::Num(Num::Int(0)));

        let (value, _) = lower(&b.slice_expr(xs, None, Some(b.int("1"))));
        let ValueKind::Slice(s) = value.kind else {
            panic!("expected slice");
        };
        assert!(s.lo.is_none());
        assert_eq!(s.hi.unwrap().kind, ValueKind::Num(Num::Int(1)));
    }

    #[test]
    fn builtin_call() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let (value, errors) = lower(&b.call(b.name("len"), &[b.list(&[])]));
        assert!(errors.is_empty());
        let ValueKind::Call(fun, args) = value.kind else {
            panic!("expected call");
        };
        assert_eq!(fun.kind, ValueKind::Builtin(Builtin::Len));
        assert_eq!(args.len(), 1);
    }
}
