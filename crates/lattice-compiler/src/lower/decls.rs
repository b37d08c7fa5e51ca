//! Files, record bodies and field declarations.

use lattice_core::{Kind, ScopeId, Span};
use lattice_core::adt::{DocComment, FieldComprehension, Value, ValueKind, Yield};
use lattice_syntax::ast::{
    ComprehensionDecl, Decl, Field, File, Label, LitKind, StructLit, TemplateLabel,
};

use super::{GraphBuilder, comprehension, errf, imports, literals, string_value};
use crate::attrs;
use crate::literal;

pub(super) fn lower_file(b: &mut GraphBuilder<'_>, file: &File<'_>, obj: ScopeId) -> Value {
    b.push_path();
    for decl in file.decls {
        lower_decl(b, obj, decl);
    }
    b.pop_path();
    Value::new(Some(file.span), ValueKind::Struct(obj))
}

/// Lower a record literal into its graph node.
pub(super) fn lower_struct(b: &mut GraphBuilder<'_>, s: &StructLit<'_>) -> Value {
    let obj = b.map_scope(s.id);
    b.graph.struct_mut(obj).src = Some(s.span);

    // `a b: 1` documents the inner-most field with the comment on `a`.
    let pass_doc = s.elts.len() == 1 && s.lbrace.is_none() && b.doc.is_some();
    let outer_doc = if pass_doc { None } else { b.doc.take() };

    b.push_path();
    let mut result = Value::new(Some(s.span), ValueKind::Struct(obj));
    for decl in s.elts {
        match decl {
            Decl::Emit(e) => {
                result = errf!(b, e.span, "emitting values is only allowed at top level");
                break;
            }
            Decl::Field(_) | Decl::Alias(_) | Decl::Comprehension(_) => lower_decl(b, obj, decl),
            Decl::Import(_) | Decl::Bad(_) | Decl::Comment(_) => {}
        }
    }
    b.pop_path();

    if !pass_doc {
        b.doc = outer_doc;
    }
    result
}

fn lower_decl(b: &mut GraphBuilder<'_>, obj: ScopeId, decl: &Decl<'_>) {
    match *decl {
        Decl::Field(field) => lower_field(b, obj, field),
        Decl::Comprehension(c) => lower_comprehension_decl(b, obj, c),
        Decl::Emit(e) => {
            let value = b.lower_expr(&e.expr);
            b.graph.struct_mut(obj).add_emit(value);
        }
        Decl::Import(i) => imports::lower_import_decl(b, i),
        // Aliases are expanded at each reference.
        Decl::Alias(_) | Decl::Bad(_) | Decl::Comment(_) => {}
    }
}

fn lower_field(b: &mut GraphBuilder<'_>, obj: ScopeId, field: &Field<'_>) {
    let optional = field.optional.is_some();
    match field.label {
        Label::Interpolation(x) => {
            b.set_sel("?");
            let key = literals::lower_interpolation(b, x);
            let value = b.lower_expr(&field.value);
            let clauses = Value::new(
                Some(x.span),
                ValueKind::Yield(Box::new(Yield {
                    key: Some(key),
                    value,
                    optional,
                })),
            );
            b.graph
                .struct_mut(obj)
                .comprehensions
                .push(FieldComprehension {
                    src: Some(field.span),
                    clauses,
                    is_template: false,
                });
        }

        Label::Template(t) => {
            b.set_sel("*");
            let template = template_lambda(b, field, t, field.span);
            b.graph.struct_mut(obj).add_template(template);
        }

        Label::Ident(_) | Label::Lit(_) => {
            if b.options.drop_optional && optional {
                return;
            }
            let name = label_name(&field.label);
            b.set_sel(name.clone().unwrap_or_default());

            let attrs = match attrs::create_attrs(field.attrs) {
                Ok(attrs) => attrs,
                Err(err) => {
                    errf!(b, err.span(), "{err}");
                    return;
                }
            };
            let Some(name) = name else {
                errf!(b, field.label.span(), "invalid field name: {}", label_text(&field.label));
                return;
            };
            let feature = b.label(&name);

            let left_over = match field.doc() {
                Some(doc) => b.doc.replace(DocComment {
                    src: Some(doc.span),
                    text: doc.text(),
                }),
                None => None,
            };
            let value = b.lower_expr(&field.value);
            let doc = b.doc.clone();
            if let Err(msg) = b
                .graph
                .struct_mut(obj)
                .insert_value(feature, optional, value, attrs, doc)
            {
                errf!(b, field.span, "{msg}");
            }
            b.doc = left_over;
        }
    }
}

/// `for ... { label: value }`
fn lower_comprehension_decl(
    b: &mut GraphBuilder<'_>,
    obj: ScopeId,
    decl: &ComprehensionDecl<'_>,
) {
    let field = decl.field;
    let optional = field.optional.is_some();

    let name = match field.label {
        Label::Ident(_) | Label::Lit(_) => match label_name(&field.label) {
            Some(name) => Some(name),
            None => {
                errf!(b, field.label.span(), "invalid field name: {}", label_text(&field.label));
                return;
            }
        },
        Label::Interpolation(_) | Label::Template(_) => None,
    };

    let mut is_template = false;
    let clauses = comprehension::wrap_clauses(b, decl.clauses, |b| {
        let (key, value) = match field.label {
            Label::Interpolation(x) => {
                b.set_sel("?");
                let key = literals::lower_interpolation(b, x);
                (Some(key), b.lower_expr(&field.value))
            }
            Label::Template(t) => {
                b.set_sel("*");
                is_template = true;
                (None, template_lambda(b, field, t, field.value.span()))
            }
            Label::Ident(_) | Label::Lit(_) => {
                let name = name.unwrap_or_default();
                b.set_sel(name.clone());
                let key = string_value(field.label.span(), name);
                (Some(key), b.lower_expr(&field.value))
            }
        };
        Value::new(
            Some(field.value.span()),
            ValueKind::Yield(Box::new(Yield {
                key,
                value,
                optional,
            })),
        )
    });

    b.graph
        .struct_mut(obj)
        .comprehensions
        .push(FieldComprehension {
            src: Some(decl.span),
            clauses,
            is_template,
        });
}

/// Build the one-parameter lambda of a `[X]: value` field.
///
/// The lambda is bound to the field node so `X` inside the value resolves
/// to the parameter.
fn template_lambda(
    b: &mut GraphBuilder<'_>,
    field: &Field<'_>,
    label: &TemplateLabel<'_>,
    src: Span,
) -> Value {
    let param = b.label(label.ident.name);
    let lambda = b.graph.alloc_lambda(Some(src));
    b.graph
        .lambda_mut(lambda)
        .add(param, Value::new(Some(label.span), ValueKind::BasicType(Kind::STRING)));
    b.scopes.set_scope(field.id, lambda);

    let body = b.lower_expr(&field.value);
    b.graph.lambda_mut(lambda).value = Some(body);
    Value::new(Some(src), ValueKind::Lambda(lambda))
}

/// The name a concrete label stands for.
fn label_name(label: &Label<'_>) -> Option<String> {
    match label {
        Label::Ident(ident) => Some(ident.name.to_string()),
        Label::Lit(lit) => match lit.kind {
            LitKind::String => literal::unquote(lit.value).ok(),
            LitKind::Null | LitKind::True | LitKind::False => Some(lit.value.to_string()),
            LitKind::Int | LitKind::Float => None,
        },
        Label::Interpolation(_) | Label::Template(_) => None,
    }
}

/// Source-like text of a label for diagnostics.
fn label_text(label: &Label<'_>) -> String {
    match label {
        Label::Ident(ident) => ident.name.to_string(),
        Label::Lit(lit) => lit.value.to_string(),
        Label::Interpolation(_) => "interpolation".to_string(),
        Label::Template(t) => format!("[{}]", t.ident.name),
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use lattice_core::adt::{Num, ValueKind};
    use lattice_core::{ErrorCode, Op};
    use lattice_syntax::ast::{AstBuilder, LitKind};

    use crate::BuildOptions;
    use crate::lower::test_support::{build, build_with};
    use crate::resolver::NoImports;

    #[test]
    fn fields_keep_source_order() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(&[
            b.field(b.label("a"), b.int("1")),
            b.field(b.label("b"), b.int("2")),
        ]);

        let built = build(file);
        let names: Vec<_> = built
            .root()
            .arcs
            .iter()
            .map(|a| built.labels.name(a.feature).unwrap().to_string())
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(built.field("a").kind, ValueKind::Num(Num::Int(1)));
        assert_eq!(built.field("b").kind, ValueKind::Num(Num::Int(2)));
        assert!(built.errors.is_empty());
    }

    #[test]
    fn string_and_keyword_labels() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(&[
            b.field(b.label_string("\"foo-bar\""), b.int("1")),
            b.field(b.label_lit(LitKind::True, "true"), b.int("2")),
        ]);
        let built = build(file);
        assert_eq!(built.field("foo-bar").kind, ValueKind::Num(Num::Int(1)));
        assert_eq!(built.field("true").kind, ValueKind::Num(Num::Int(2)));
    }

    #[test]
    fn invalid_label_skips_the_field_only() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(&[
            b.field(b.label_lit(LitKind::Int, "3"), b.int("1")),
            b.field(b.label("ok"), b.int("2")),
        ]);
        let built = build(file);
        assert_eq!(built.root().arcs.len(), 1);
        assert_eq!(built.errors.len(), 1);
        assert_eq!(
            built.errors.iter().next().unwrap().message(),
            "invalid field name: 3"
        );
    }

    #[test]
    fn duplicate_fields_unify() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(&[
            b.optional_field(b.label("a"), b.int("1")),
            b.field(b.label("a"), b.name("int")),
        ]);
        let built = build(file);
        let arcs = &built.root().arcs;
        assert_eq!(arcs.len(), 1);
        assert!(!arcs[0].optional);
        assert!(matches!(arcs[0].value.kind, ValueKind::Binary(Op::Unify, _, _)));
    }

    #[test]
    fn drop_optional_skips_optional_fields() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(&[
            b.optional_field(b.label("a"), b.int("1")),
            b.field(b.label("b"), b.int("2")),
        ]);
        let options = BuildOptions {
            drop_optional: true,
            ..BuildOptions::default()
        };
        let built = build_with(file, &NoImports, options);
        assert_eq!(built.root().arcs.len(), 1);
        assert!(built.labels.lookup("a").is_none());
    }

    #[test]
    fn attributes_are_recorded_and_checked() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let good = b.field_decl(None, b.label("a"), b.int("1"), false, &["@go(A)"], &[]);
        let bad = b.field_decl(None, b.label("c"), b.int("1"), false, &["@go(A)", "@go(B)"], &[]);
        let file = b.file(&[
            lattice_syntax::Decl::Field(good),
            lattice_syntax::Decl::Field(bad),
        ]);
        let built = build(file);
        let a = built.labels.lookup("a").unwrap();
        assert_eq!(built.root().lookup(a).unwrap().attrs.get("go"), Some("A"));
        assert_eq!(built.root().arcs.len(), 1);
        assert!(built.errors.messages().contains("declared more than once"));
    }

    #[test]
    fn docs_attach_to_fields() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.field_decl(None, b.label("a"), b.int("1"), false, &[], &["about a"]);
        let file = b.file(&[lattice_syntax::Decl::Field(a), b.field(b.label("b"), b.int("2"))]);
        let built = build(file);
        let arcs = &built.root().arcs;
        assert_eq!(arcs[0].docs.len(), 1);
        assert_eq!(arcs[0].docs[0].text, "about a");
        assert!(arcs[1].docs.is_empty());
    }

    #[test]
    fn doc_passes_through_brace_less_struct() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        // // about bar
        // foo bar: 1
        let inner = b.field(b.label("bar"), b.int("1"));
        let outer = b.field_decl(None, b.label("foo"), b.sugar_struct(inner), false, &[], &["about bar"]);
        let built = build(b.file(&[lattice_syntax::Decl::Field(outer)]));

        let foo = &built.root().arcs[0];
        assert!(foo.docs.is_empty());
        let bar = &built.record(&foo.value).arcs[0];
        assert_eq!(bar.docs[0].text, "about bar");
    }

    #[test]
    fn emit_merges_at_top_level() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(&[b.emit(b.int("1")), b.emit(b.name("int"))]);
        let built = build(file);
        let emit = built.root().emit.as_ref().unwrap();
        assert!(matches!(emit.kind, ValueKind::Binary(Op::Unify, _, _)));
    }

    #[test]
    fn emit_inside_struct_is_an_error() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.struct_lit(&[b.emit(b.int("1"))]);
        let file = b.file(&[b.field(b.label("a"), inner), b.field(b.label("b"), b.int("2"))]);
        let built = build(file);
        let a = built.field("a").as_bottom().unwrap();
        assert_eq!(a.code, ErrorCode::EvalError);
        assert_eq!(a.message(), "emitting values is only allowed at top level");
        assert_eq!(built.errors.iter().next().unwrap().path(), ["a"]);
        assert_eq!(built.field("b").kind, ValueKind::Num(Num::Int(2)));
    }

    #[test]
    fn templates_merge() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f1 = b.reserve();
        let t1 = b.field_decl(Some(f1), b.label_template("X"), b.node_ref("X", f1), false, &[], &[]);
        let t2 = b.field(b.label_template("Y"), b.name("string"));
        let file = b.file(&[lattice_syntax::Decl::Field(t1), t2]);
        let built = build(file);

        let template = built.root().template.as_ref().unwrap();
        let ValueKind::Binary(Op::Unify, first, _) = &template.kind else {
            panic!("expected unified templates: {template:?}");
        };
        let ValueKind::Lambda(id) = first.kind else {
            panic!("expected lambda");
        };
        let lambda = built.graph.as_lambda(id).unwrap();
        assert_eq!(lambda.params.len(), 1);
        assert_eq!(built.labels.name(lambda.params[0].feature), Some("X"));
        // The body refers back to the lambda itself.
        assert_eq!(
            lambda.value.as_ref().unwrap().kind,
            ValueKind::NodeRef(id)
        );
    }

    #[test]
    fn interpolated_label_becomes_comprehension() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let label = b.label_interpolation(&[b.string("\"a\\("), b.name("int"), b.string(")\"")]);
        let file = b.file(&[b.field(label, b.int("1"))]);
        let built = build(file);
        let root = built.root();
        assert!(root.arcs.is_empty());
        assert_eq!(root.comprehensions.len(), 1);
        let ValueKind::Yield(y) = &root.comprehensions[0].clauses.kind else {
            panic!("expected a bare yield");
        };
        assert!(matches!(y.key.as_ref().unwrap().kind, ValueKind::Interpolation(_, _)));
    }

    #[test]
    fn nested_error_path() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.struct_lit(&[b.field(b.label("b"), b.name("missing"))]);
        let file = b.file(&[b.field(b.label("a"), inner)]);
        let built = build(file);
        let err = built.errors.iter().next().unwrap();
        assert_eq!(err.path(), ["a", "b"]);
        assert_eq!(err.message(), "reference \"missing\" not found");
    }
}
