//! Unary and binary operators.

use lattice_core::adt::{Bound, Value, ValueKind};
use lattice_core::{Kind, Op};
use lattice_syntax::ast::{BinaryExpr, Token, UnaryExpr};

use super::{GraphBuilder, disjunction, errf};

/// Map an operator token onto its graph operator.
pub(super) fn op_of(token: Token) -> Op {
    match token {
        Token::And => Op::Unify,
        Token::Or => Op::Disjoin,
        Token::LAnd => Op::And,
        Token::LOr => Op::Or,
        Token::Not => Op::Not,
        Token::Eql => Op::Equal,
        Token::Neq => Op::NotEqual,
        Token::Lss => Op::Less,
        Token::Leq => Op::LessEqual,
        Token::Gtr => Op::Greater,
        Token::Geq => Op::GreaterEqual,
        Token::Mat => Op::Match,
        Token::NMat => Op::NotMatch,
        Token::Add => Op::Add,
        Token::Sub => Op::Sub,
        Token::Mul => Op::Mul,
        Token::Quo => Op::Div,
        Token::Rem => Op::Rem,
        Token::IDiv => Op::IntDiv,
        Token::IMod => Op::IntMod,
        Token::IQuo => Op::IntQuo,
        Token::IRem => Op::IntRem,
    }
}

/// Prefix operators. Relational prefixes (`>=1`, `=~"x"`) become bounds.
pub(super) fn lower_unary(b: &mut GraphBuilder<'_>, u: &UnaryExpr<'_>) -> Value {
    match u.op {
        Token::Not | Token::Add | Token::Sub => {
            let x = b.lower_expr(&u.x);
            Value::new(Some(u.span), ValueKind::Unary(op_of(u.op), Box::new(x)))
        }
        Token::Geq
        | Token::Gtr
        | Token::Lss
        | Token::Leq
        | Token::Neq
        | Token::Mat
        | Token::NMat => {
            let value = b.lower_expr(&u.x);
            Value::new(
                Some(u.span),
                ValueKind::Bound(Box::new(Bound {
                    op: op_of(u.op),
                    kind: Kind::TOP | Kind::NON_GROUND,
                    value,
                })),
            )
        }
        Token::Mul => errf!(b, u.span, "preference mark not allowed at this position"),
        op => errf!(b, u.span, "unsupported unary operator {:?}", op.as_str()),
    }
}

/// Infix operators. `|` chains are collected into a single disjunction.
pub(super) fn lower_binary(b: &mut GraphBuilder<'_>, x: &BinaryExpr<'_>) -> Value {
    if x.op == Token::Or {
        return disjunction::lower_disjunction(b, x);
    }
    let lhs = b.lower_expr(&x.x);
    let rhs = b.lower_expr(&x.y);
    Value::new(
        Some(x.span),
        ValueKind::Binary(op_of(x.op), Box::new(lhs), Box::new(rhs)),
    )
}
