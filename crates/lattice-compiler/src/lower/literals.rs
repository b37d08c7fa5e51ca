//! Basic literals and string interpolation.

use lattice_core::Kind;
use lattice_core::adt::{Value, ValueKind};
use lattice_syntax::ast::{BasicLit, Expr, Interpolation, LitKind};

use super::{GraphBuilder, errf};
use crate::literal::{self, LiteralError, QuoteInfo};

pub(super) fn lower_basic_lit(b: &mut GraphBuilder<'_>, lit: &BasicLit<'_>) -> Value {
    let src = Some(lit.span);
    match lit.kind {
        LitKind::Null => Value::new(src, ValueKind::Null),
        LitKind::True => Value::new(src, ValueKind::Bool(true)),
        LitKind::False => Value::new(src, ValueKind::Bool(false)),
        LitKind::Int | LitKind::Float => match literal::parse_number(lit.value) {
            Ok(n) => Value::new(src, ValueKind::Num(n)),
            Err(err) => errf!(b, lit.span, "{err}"),
        },
        LitKind::String => match literal::unquote_bytes(lit.value) {
            Ok((info, bytes)) => match text_value(&info, bytes) {
                Ok(kind) => Value::new(src, kind),
                Err(err) => errf!(b, lit.span, "invalid string: {err}"),
            },
            Err(err) => errf!(b, lit.span, "invalid string: {err}"),
        },
    }
}

fn text_value(info: &QuoteInfo, bytes: Vec<u8>) -> Result<ValueKind, LiteralError> {
    if info.is_bytes() {
        return Ok(ValueKind::Bytes(bytes));
    }
    String::from_utf8(bytes)
        .map(ValueKind::String)
        .map_err(|_| LiteralError::InvalidUtf8)
}

/// `"a \(x) b"`
///
/// The parts alternate between literal fragments and embedded expressions,
/// starting and ending with a fragment. Every fragment after the first
/// starts with the `)` closing the preceding expression.
pub(super) fn lower_interpolation(b: &mut GraphBuilder<'_>, x: &Interpolation<'_>) -> Value {
    let (Some(Expr::BasicLit(first)), Some(Expr::BasicLit(last))) = (x.elts.first(), x.elts.last())
    else {
        return errf!(b, x.span, "invalid interpolation");
    };
    if x.elts.len() == 1 {
        return lower_basic_lit(b, first);
    }

    let (info, mut prefix_len, _) = match literal::parse_quotes(first.value, last.value) {
        Ok(quotes) => quotes,
        Err(err) => return errf!(b, x.span, "invalid interpolation: {err}"),
    };

    let mut parts = Vec::with_capacity(x.elts.len());
    let mut prefix = "";
    for (i, pair) in x.elts.chunks(2).enumerate() {
        let Expr::BasicLit(l) = pair[0] else {
            return errf!(b, x.span, "invalid interpolation");
        };
        let Some(s) = l
            .value
            .strip_prefix(prefix)
            .and_then(|_| l.value.get(prefix_len..))
        else {
            return errf!(b, l.span, "invalid interpolation: unmatched ')'");
        };

        let fragment = info
            .unquote_fragment(s, i == 0)
            .and_then(|bytes| text_value(&info, bytes));
        match fragment {
            Ok(kind) => parts.push(Value::new(Some(l.span), kind)),
            Err(err) => return errf!(b, l.span, "invalid string: {err}"),
        }
        if let Some(expr) = pair.get(1) {
            parts.push(b.lower_expr(expr));
        }

        prefix = ")";
        prefix_len = 1;
    }

    let kind = if info.is_bytes() { Kind::BYTES } else { Kind::STRING };
    Value::new(Some(x.span), ValueKind::Interpolation(kind, parts))
}
