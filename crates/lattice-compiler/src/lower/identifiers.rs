//! Identifier resolution.
//!
//! An identifier bound by the name-binding pass lowers to a reference to the
//! graph node of its binding. An unbound identifier is looked up, in order,
//! in the resolve root, among builtin shorthand packages (only inside a
//! selector chain), among the builtin names and among the predefined bounds.

use lattice_core::adt::{Bound, Builtin, GraphNode, Num, Package, Value, ValueKind};
use lattice_core::{Kind, Op, ScopeId, Span};
use lattice_syntax::ast::{Alias, Ident, Resolution};

use super::{GraphBuilder, errf};

pub(super) fn lower_ident(b: &mut GraphBuilder<'_>, ident: &Ident<'_>) -> Value {
    let src = Some(ident.span);
    match ident.resolution {
        None => match resolve(b, ident) {
            Some(value) => value,
            None => errf!(b, ident.span, "reference {:?} not found", ident.name),
        },
        Some(Resolution::Alias(alias)) => expand_alias(b, ident, alias),
        Some(Resolution::Scope(scope)) => {
            let node = b.map_scope(scope);
            let feature = b.label(ident.name);
            Value::new(
                src,
                ValueKind::Selector(Box::new(Value::new(src, ValueKind::NodeRef(node))), feature),
            )
        }
        Some(Resolution::Node(node)) => {
            let node = b.map_scope(node);
            Value::new(src, ValueKind::NodeRef(node))
        }
    }
}

/// Aliases are expanded in place. The expression is lowered once and every
/// later reference shares the result, so its syntax nodes map to a single
/// set of graph nodes. An alias that refers back to itself while being
/// expanded is an error.
fn expand_alias(b: &mut GraphBuilder<'_>, ident: &Ident<'_>, alias: &Alias<'_>) -> Value {
    if let Some(value) = b.aliases.get(&alias.id) {
        return value.clone();
    }
    if b.expanding.contains(&alias.id) {
        return errf!(b, ident.span, "cyclic alias {:?}", ident.name);
    }
    b.expanding.push(alias.id);
    let value = b.lower_expr(&alias.expr);
    b.expanding.pop();
    b.aliases.insert(alias.id, value.clone());
    value
}

fn resolve(b: &mut GraphBuilder<'_>, ident: &Ident<'_>) -> Option<Value> {
    let src = Some(ident.span);

    if let Some(root) = b.resolve_root {
        let feature = b.label(ident.name);
        let declared = b
            .graph
            .as_struct(root)
            .is_some_and(|s| s.lookup(feature).is_some());
        if declared {
            return Some(Value::new(
                src,
                ValueKind::Selector(Box::new(Value::new(src, ValueKind::NodeRef(root))), feature),
            ));
        }
    }

    if b.in_selector > 0
        && b.options.allow_shorthand_packages
        && let Some(pkg) = shorthand_package(b, ident.name)
    {
        return Some(Value::new(src, ValueKind::NodeRef(pkg)));
    }

    builtin(ident.name, src).or_else(|| predefined_range(ident.name))
}

/// The package node for a builtin shorthand, allocated once per build.
fn shorthand_package(b: &mut GraphBuilder<'_>, name: &str) -> Option<ScopeId> {
    if let Some(&pkg) = b.shorthands.get(name) {
        return Some(pkg);
    }
    let value = b.resolver.lookup_builtin_shorthand(name)?;
    let pkg = b.graph.alloc(GraphNode::Package(Package {
        src: None,
        path: name.to_string(),
        value,
    }));
    tracing::debug!(name, package = %pkg, "resolved builtin shorthand");
    b.shorthands.insert(name.to_string(), pkg);
    Some(pkg)
}

fn builtin(name: &str, src: Option<Span>) -> Option<Value> {
    let kind = match name {
        "_" => ValueKind::Top,
        "string" => ValueKind::BasicType(Kind::STRING),
        "bytes" => ValueKind::BasicType(Kind::BYTES),
        "bool" => ValueKind::BasicType(Kind::BOOL),
        "int" => ValueKind::BasicType(Kind::INT),
        "float" => ValueKind::BasicType(Kind::FLOAT),
        "number" => ValueKind::BasicType(Kind::NUMBER),
        "duration" => ValueKind::BasicType(Kind::DURATION),
        "len" => ValueKind::Builtin(Builtin::Len),
        "and" => ValueKind::Builtin(Builtin::And),
        "or" => ValueKind::Builtin(Builtin::Or),
        _ => return None,
    };
    Some(Value::new(src, kind))
}

// ============================================================================
// Predefined bounds
// ============================================================================

/// Lower and upper limit of a predefined bound.
#[derive(Clone, Copy)]
enum Limit {
    Int(i128),
    Uint(u128),
    Float(f64),
}

impl Limit {
    fn value(self) -> Value {
        let num = |n| Value::new(None, ValueKind::Num(n));
        match self {
            Limit::Int(n) if n < 0 => Value::new(
                None,
                ValueKind::Unary(Op::Sub, Box::new(num(Num::Int(n.unsigned_abs())))),
            ),
            Limit::Int(n) => num(Num::Int(n as u128)),
            Limit::Uint(n) => num(Num::Int(n)),
            Limit::Float(f) if f < 0.0 => Value::new(
                None,
                ValueKind::Unary(Op::Sub, Box::new(num(Num::Float((-f).into())))),
            ),
            Limit::Float(f) => num(Num::Float(f.into())),
        }
    }
}

fn predefined_range(name: &str) -> Option<Value> {
    use Limit::*;
    let (kind, lo, hi) = match name {
        "rune" => (Kind::INT, Int(0), Int(0x10FFFF)),
        "int8" => (Kind::INT, Int(i8::MIN.into()), Int(i8::MAX.into())),
        "int16" => (Kind::INT, Int(i16::MIN.into()), Int(i16::MAX.into())),
        "int32" => (Kind::INT, Int(i32::MIN.into()), Int(i32::MAX.into())),
        "int64" => (Kind::INT, Int(i64::MIN.into()), Int(i64::MAX.into())),
        "int128" => (Kind::INT, Int(i128::MIN), Int(i128::MAX)),
        "uint8" => (Kind::INT, Uint(0), Uint(u8::MAX.into())),
        "uint16" => (Kind::INT, Uint(0), Uint(u16::MAX.into())),
        "uint32" => (Kind::INT, Uint(0), Uint(u32::MAX.into())),
        "uint64" => (Kind::INT, Uint(0), Uint(u64::MAX.into())),
        "uint128" => (Kind::INT, Uint(0), Uint(u128::MAX)),
        "float32" => (Kind::FLOAT, Float(-f64::from(f32::MAX)), Float(f64::from(f32::MAX))),
        "float64" => (Kind::FLOAT, Float(-f64::MAX), Float(f64::MAX)),
        "uint" => {
            return Some(bound(Op::GreaterEqual, Kind::INT, Uint(0)));
        }
        _ => return None,
    };
    Some(Value::unify(
        bound(Op::GreaterEqual, kind, lo),
        bound(Op::LessEqual, kind, hi),
    ))
}

fn bound(op: Op, kind: Kind, limit: Limit) -> Value {
    Value::new(
        None,
        ValueKind::Bound(Box::new(Bound {
            op,
            kind,
            value: limit.value(),
        })),
    )
}
