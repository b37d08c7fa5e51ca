//! Desugaring of `for` and `if` clauses.
//!
//! Clauses are wrapped around the innermost yield from right to left. A
//! `for` clause becomes a [`Feed`](ValueKind::Feed) of its source into a
//! two-parameter lambda (key, value) whose body is the next-inner node; an
//! `if` clause becomes a [`Guard`](ValueKind::Guard).

use lattice_core::Kind;
use lattice_core::adt::{Value, ValueKind, Yield};
use lattice_syntax::ast::{Clause, ListComprehension};

use super::GraphBuilder;

/// Wrap the value produced by `make_yield` in `clauses`.
///
/// The lambdas of all `for` clauses are bound before the yield and the
/// clause sources are lowered, so loop variables resolve to them wherever
/// they appear.
pub(super) fn wrap_clauses<'a>(
    b: &mut GraphBuilder<'a>,
    clauses: &[Clause<'_>],
    make_yield: impl FnOnce(&mut GraphBuilder<'a>) -> Value,
) -> Value {
    for clause in clauses {
        if let Clause::For(f) = clause {
            let lambda = b.graph.alloc_lambda(Some(f.source.span()));
            b.scopes.set_scope(f.id, lambda);
        }
    }

    let mut inner = make_yield(b);
    for clause in clauses.iter().rev() {
        inner = match clause {
            Clause::For(f) => {
                let lambda = b.map_scope(f.id);
                let key = b.label(f.key.map_or("_", |k| k.name));
                let value = b.label(f.value.name);
                let key_src = f.key.map(|k| k.span);

                let fun = b.graph.lambda_mut(lambda);
                fun.value = Some(inner);
                fun.add(
                    key,
                    Value::new(key_src, ValueKind::BasicType(Kind::STRING | Kind::INT)),
                );
                fun.add(value, Value::top());

                let source = b.lower_expr(&f.source);
                Value::new(
                    Some(f.source.span()),
                    ValueKind::Feed(Box::new(source), lambda),
                )
            }
            Clause::If(c) => {
                let condition = b.lower_expr(&c.condition);
                Value::new(
                    Some(c.condition.span()),
                    ValueKind::Guard(Box::new(condition), Box::new(inner)),
                )
            }
        };
    }
    inner
}

/// `[ expr for ... ]`
pub(super) fn lower_list_comprehension(b: &mut GraphBuilder<'_>, lc: &ListComprehension<'_>) -> Value {
    let clauses = wrap_clauses(b, lc.clauses, |b| {
        let value = b.lower_expr(&lc.expr);
        Value::new(
            Some(lc.expr.span()),
            ValueKind::Yield(Box::new(Yield {
                key: None,
                value,
                optional: false,
            })),
        )
    });
    Value::new(
        Some(lc.span),
        ValueKind::ListComprehension(Box::new(clauses)),
    )
}
