//! Integration tests for lattice using Instance as the entry point.
//!
//! These tests build syntax trees the way a parser and name binder would and
//! check the value graph and diagnostics that come out of lowering.

use bumpalo::Bump;
use lattice::core::adt::{GraphNode, Num, Value, ValueKind, Vertices};
use lattice::core::{Kind, OpContext, Span, combine_bottoms};
use lattice::syntax::ast::{LitKind, Token};
use lattice::syntax::AstBuilder;
use lattice::{Bottom, BuildOptions, ErrorCode, Instance, PackageTable};

fn int(n: u128) -> ValueKind {
    ValueKind::Num(Num::Int(n))
}

fn field<'i, R: lattice::ImportResolver>(inst: &'i Instance<R>, name: &str) -> &'i Value {
    let feature = inst.labels().lookup(name).expect("label interned");
    &inst
        .root_struct()
        .lookup(feature)
        .unwrap_or_else(|| panic!("no field {name}"))
        .value
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn test_record_keeps_declaration_order() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let file = b.file(&[
        b.field(b.label("a"), b.int("1")),
        b.field(b.label("b"), b.string(r#""x""#)),
    ]);

    let mut inst = Instance::new();
    inst.insert_file(file).unwrap();
    assert!(inst.diagnostics().is_empty());

    let names: Vec<_> = inst
        .root_struct()
        .arcs
        .iter()
        .map(|a| inst.labels().name(a.feature).unwrap())
        .collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(field(&inst, "a").kind, int(1));
    assert_eq!(field(&inst, "b").kind, ValueKind::String("x".into()));
}

#[test]
fn test_files_merge_into_one_root() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let first = b.file(&[b.field(b.label("a"), b.name("int"))]);
    let second = b.file(&[
        b.field(b.label("a"), b.int("1")),
        b.field(b.label("b"), b.bool(true)),
    ]);

    let mut inst = Instance::new();
    inst.insert_file(first).unwrap();
    inst.insert_file(second).unwrap();

    assert_eq!(inst.root_struct().arcs.len(), 2);
    let ValueKind::Binary(op, lhs, rhs) = &field(&inst, "a").kind else {
        panic!("expected the two declarations of `a` to be unified");
    };
    assert_eq!(*op, lattice::core::Op::Unify);
    assert_eq!(lhs.kind, ValueKind::BasicType(Kind::INT));
    assert_eq!(rhs.kind, int(1));
}

#[test]
fn test_optional_fields_can_be_dropped() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let file = b.file(&[
        b.optional_field(b.label("opt"), b.int("1")),
        b.field(b.label("req"), b.int("2")),
    ]);

    let mut kept = Instance::new();
    kept.insert_file(file).unwrap();
    assert_eq!(kept.root_struct().arcs.len(), 2);
    assert!(kept.root_struct().arcs[0].optional);

    let mut dropped = Instance::new().with_options(BuildOptions {
        drop_optional: true,
        ..BuildOptions::default()
    });
    dropped.insert_file(file).unwrap();
    assert_eq!(dropped.root_struct().arcs.len(), 1);
}

// =============================================================================
// Disjunctions and comprehensions
// =============================================================================

#[test]
fn test_disjunction_with_default() {
    // x: 1 | *2 | 3
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let head = b.binary(Token::Or, b.int("1"), b.unary(Token::Mul, b.int("2")));
    let file = b.file(&[b.field(b.label("x"), b.binary(Token::Or, head, b.int("3")))]);

    let mut inst = Instance::new();
    inst.insert_file(file).unwrap();

    let ValueKind::Disjunction(d) = &field(&inst, "x").kind else {
        panic!("expected disjunction");
    };
    let branches: Vec<_> = d
        .values
        .iter()
        .map(|v| (v.value.kind.clone(), v.is_default))
        .collect();
    assert_eq!(branches, [(int(1), false), (int(2), true), (int(3), false)]);
    assert!(d.has_defaults);
}

#[test]
fn test_field_comprehension_shape() {
    // for x in [1, 2] if x > 1 { "\(x)": x }
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let clause = b.reserve();
    let label = b.label_interpolation(&[
        b.string(r#""\("#),
        b.node_ref("x", clause),
        b.string(r#")""#),
    ]);
    let field = b.field_decl(None, label, b.node_ref("x", clause), false, &[], &[]);
    let decl = b.comprehension(
        field,
        &[
            b.for_clause(Some(clause), None, "x", b.list(&[b.int("1"), b.int("2")])),
            b.if_clause(b.binary(Token::Gtr, b.node_ref("x", clause), b.int("1"))),
        ],
    );

    let mut inst = Instance::new();
    inst.insert_file(b.file(&[decl])).unwrap();
    assert!(inst.diagnostics().is_empty(), "{}", inst.diagnostics());

    let root = inst.root_struct();
    assert!(root.arcs.is_empty());
    let ValueKind::Feed(source, lambda) = &root.comprehensions[0].clauses.kind else {
        panic!("expected feed");
    };
    assert!(matches!(source.kind, ValueKind::List(_)));

    let GraphNode::Lambda(fun) = inst.graph().get(*lambda) else {
        panic!("expected lambda");
    };
    assert_eq!(fun.params.len(), 2);
    let ValueKind::Guard(_, inner) = &fun.value.as_ref().unwrap().kind else {
        panic!("expected guard");
    };
    let ValueKind::Yield(y) = &inner.kind else {
        panic!("expected yield");
    };
    assert!(matches!(
        y.key.as_ref().unwrap().kind,
        ValueKind::Interpolation(Kind::STRING, _)
    ));
    assert_eq!(y.value.kind, ValueKind::NodeRef(*lambda));
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn test_unresolved_reference() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let file = b.file(&[b.field(b.label("a"), b.name("foo"))]);

    let mut inst = Instance::new();
    inst.insert_file(file).unwrap();

    let bottom = field(&inst, "a").as_bottom().expect("bottom");
    assert_eq!(bottom.code, ErrorCode::EvalError);
    assert!(bottom.message().contains("foo"));

    let err = inst.diagnostics().iter().next().unwrap();
    assert_eq!(err.path(), ["a"]);
    assert!(err.to_string().starts_with("a: reference \"foo\" not found"));
}

#[test]
fn test_malformed_interpolation_is_local() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let broken = b.interpolation(&[b.string(r#""a \("#), b.int("1"), b.string(r#"b""#)]);
    let file = b.file(&[
        b.field(b.label("s"), broken),
        b.field(b.label("t"), b.int("2")),
    ]);

    let mut inst = Instance::new();
    assert!(inst.insert_file(file).is_ok());
    assert!(field(&inst, "s").is_bottom());
    assert_eq!(field(&inst, "t").kind, int(2));

    let messages = inst.diagnostics().messages();
    assert!(messages.starts_with("invalid interpolation"), "{messages}");
}

#[test]
fn test_diagnostics_accumulate_across_files() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let bad_label = b.label_lit(LitKind::Int, "3");
    let first = b.file(&[b.field(bad_label, b.int("1"))]);
    let second = b.file(&[b.emit(b.struct_lit(&[b.emit(b.int("1"))]))]);

    let mut inst = Instance::new();
    inst.insert_file(first).unwrap();
    inst.insert_file(second).unwrap();

    let messages: Vec<_> = inst.diagnostics().iter().map(|e| e.message()).collect();
    assert_eq!(
        messages,
        [
            "invalid field name: 3",
            "emitting values is only allowed at top level"
        ]
    );
    assert!(inst.root_struct().emit.as_ref().unwrap().is_bottom());
}

#[test]
fn test_user_bottom_is_not_a_diagnostic() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let file = b.file(&[b.field(b.label("x"), b.bottom())]);

    let mut inst = Instance::new();
    inst.insert_file(file).unwrap();
    assert!(inst.diagnostics().is_empty());
    assert!(field(&inst, "x").is_literal_bottom());
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_expression_resolves_against_root() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let file = b.file(&[b.field(b.label("port"), b.int("80"))]);

    let mut inst = Instance::new();
    inst.insert_file(file).unwrap();

    let value = inst.lower_expr(&b.binary(Token::Add, b.name("port"), b.int("1")));
    let ValueKind::Binary(_, lhs, _) = value.kind else {
        panic!("expected binary");
    };
    let ValueKind::Selector(base, _) = lhs.kind else {
        panic!("expected a selector on the root");
    };
    assert_eq!(base.kind, ValueKind::NodeRef(inst.root()));

    let missing = inst.lower_expr(&b.name("host"));
    assert!(missing.is_bottom());
    assert_eq!(inst.diagnostics().len(), 1);
}

#[test]
fn test_instance_scope_is_visible_to_files() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let mut inst = Instance::new();
    let env = inst.labels_mut().label("env");
    inst.scope_mut()
        .insert_value(env, false, Value::top(), Default::default(), None)
        .unwrap();
    inst.insert_file(b.file(&[b.field(b.label("e"), b.name("env"))]))
        .unwrap();

    assert!(inst.diagnostics().is_empty());
    assert!(matches!(field(&inst, "e").kind, ValueKind::Selector(_, f) if f == env));
}

#[test]
fn test_imports_resolve_through_the_table() {
    let mut table = PackageTable::new();
    table.add_builtin("list", Value::new(None, ValueKind::String("list".into())));

    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let spec = b.reserve();
    let file = b.file(&[
        b.import(&[
            b.import_spec(Some(spec), None, r#""list""#),
            b.import_spec(None, None, r#""missing/pkg""#),
        ]),
        b.field(b.label("l"), b.selector(b.node_ref("list", spec), "Sort")),
    ]);

    let mut inst = Instance::with_resolver(table);
    inst.insert_file(file).unwrap();

    assert_eq!(
        inst.diagnostics().messages(),
        "package \"missing/pkg\" not found"
    );
    let ValueKind::Selector(pkg, _) = &field(&inst, "l").kind else {
        panic!("expected selector");
    };
    let ValueKind::NodeRef(pkg) = pkg.kind else {
        panic!("expected package reference");
    };
    assert!(matches!(inst.graph().get(pkg), GraphNode::Package(p) if p.path == "list"));
}

#[test]
fn test_free_comments_and_bad_decls_are_ignored() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let file = b.file(&[
        b.comment(&["// stray"]),
        b.bad_decl(),
        b.field(b.label("a"), b.int("1")),
    ]);
    let mut inst = Instance::new();
    inst.insert_file(file).unwrap();
    assert!(inst.diagnostics().is_empty());
    assert_eq!(inst.root_struct().arcs.len(), 1);
}

// =============================================================================
// Error algebra
// =============================================================================

#[test]
fn test_fatal_error_wins_over_incomplete() {
    let fatal = Bottom::new(ErrorCode::UserError, "conflicting values 1 and 2");
    let incomplete = Bottom::new(ErrorCode::IncompleteError, "non-concrete value");

    for (x, y) in [(&fatal, &incomplete), (&incomplete, &fatal)] {
        let got = combine_bottoms(None, Some(x), Some(y)).unwrap();
        assert_eq!(got.code, ErrorCode::UserError);
        assert_eq!(got.message(), "conflicting values 1 and 2");
    }
}

#[test]
fn test_same_class_errors_merge() {
    let eval = Bottom::new(ErrorCode::EvalError, "x");
    let user = Bottom::new(ErrorCode::UserError, "y");
    let got = combine_bottoms(None, Some(&user), Some(&eval)).unwrap();
    assert_eq!(got.code, ErrorCode::EvalError);
    assert_eq!(got.message(), "x; y");
}

#[test]
fn test_child_errors_reach_the_root() {
    let mut inst = Instance::new();
    let a = inst.labels_mut().label("a");
    let bb = inst.labels_mut().label("b");

    let mut vertices = Vertices::new();
    let root = vertices.add_root(Value::top());
    let va = vertices.add_arc(root, a, Value::top());
    let leaf = Bottom::new(ErrorCode::UserError, "boom").at(Some(Span::new(3, 1, 1)));
    let vb = vertices.add_arc(va, bb, leaf.into());
    vertices.propagate_error(vb);

    let root_value = &vertices.get(root).unwrap().value;
    let bottom = root_value.as_bottom().unwrap();
    assert_eq!(bottom.code, ErrorCode::UserError);
    assert!(bottom.child_error);
    assert_eq!(bottom.value.as_deref(), Some(&Value::top()));

    let ctx = OpContext::new(inst.labels(), &vertices).at_vertex(vb);
    let err = ctx.new_at(Some(Span::new(3, 1, 1)), format_args!("boom"));
    assert_eq!(err.path(), ["a", "b"]);
}
