//! Disjunctions.
//!
//! A chain of `|` operators is flattened left to right into one
//! [`Disjunction`]. A branch written as `*x` is a default; the marker is
//! stripped and only recorded on the branch. Parenthesized disjunctions are
//! not flattened into the enclosing chain.

use lattice_core::adt::{DValue, Disjunction, Value, ValueKind};
use lattice_syntax::ast::{BinaryExpr, Expr, Token};

use super::GraphBuilder;

pub(super) fn lower_disjunction(b: &mut GraphBuilder<'_>, x: &BinaryExpr<'_>) -> Value {
    let mut d = Disjunction::default();
    add_branch(b, &mut d, &x.x);
    add_branch(b, &mut d, &x.y);
    Value::new(Some(x.span), ValueKind::Disjunction(Box::new(d)))
}

fn add_branch(b: &mut GraphBuilder<'_>, d: &mut Disjunction, expr: &Expr<'_>) {
    let (expr, is_default) = match *expr {
        Expr::Binary(x) if x.op == Token::Or => {
            add_branch(b, d, &x.x);
            add_branch(b, d, &x.y);
            return;
        }
        Expr::Unary(u) if u.op == Token::Mul => (u.x, true),
        e => (e, false),
    };
    d.has_defaults |= is_default;
    let value = b.lower_expr(&expr);
    d.values.push(DValue { value, is_default });
}
