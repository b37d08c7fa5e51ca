//! Import declarations.
//!
//! Each import spec is resolved through the build's [`ImportResolver`]:
//! builtin packages first, then external build units. The resolved package
//! is bound to the spec node, so identifiers bound to the spec lower to a
//! reference to the package.
//!
//! [`ImportResolver`]: crate::resolver::ImportResolver

use lattice_core::adt::{GraphNode, Package};
use lattice_syntax::ast::{ImportDecl, ImportSpec};

use super::{GraphBuilder, errf};
use crate::literal;

pub(super) fn lower_import_decl(b: &mut GraphBuilder<'_>, decl: &ImportDecl<'_>) {
    for spec in decl.specs {
        lower_import_spec(b, spec);
    }
}

fn lower_import_spec(b: &mut GraphBuilder<'_>, spec: &ImportSpec<'_>) {
    let Ok(path) = literal::unquote(spec.path.value) else {
        errf!(b, spec.span, "illformed import spec");
        return;
    };

    let value = match b.resolver.lookup_builtin_package(&path) {
        Some(value) => {
            tracing::debug!(%path, "resolved builtin package");
            value
        }
        None => match b.resolver.load_import(&path) {
            Some(unit) => {
                tracing::debug!(%path, %unit, "resolved import");
                b.resolver.evaluate_to_value(unit)
            }
            None => {
                errf!(b, spec.span, "package {path:?} not found");
                return;
            }
        },
    };

    if value.is_bottom() {
        return;
    }
    let pkg = b.graph.alloc(GraphNode::Package(Package {
        src: Some(spec.span),
        path,
        value,
    }));
    b.scopes.set_scope(spec.id, pkg);
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use lattice_core::ScopeId;
    use lattice_core::adt::{GraphNode, Value, ValueKind};
    use lattice_syntax::ast::AstBuilder;

    use crate::lower::test_support::{build, build_with};
    use crate::options::BuildOptions;
    use crate::resolver::PackageTable;

    fn marker(s: &str) -> Value {
        Value::new(None, ValueKind::String(s.to_string()))
    }

    #[test]
    fn builtin_import_binds_the_spec() {
        let mut table = PackageTable::new();
        table.add_builtin("strings", marker("strings"));

        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let spec_id = b.reserve();
        let file = b.file(&[
            b.import(&[b.import_spec(Some(spec_id), None, r#""strings""#)]),
            b.field(b.label("a"), b.selector(b.node_ref("strings", spec_id), "ToUpper")),
        ]);
        let built = build_with(file, &table, BuildOptions::default());
        assert!(built.errors.is_empty(), "{}", built.errors.messages());

        let ValueKind::Selector(x, _) = &built.field("a").kind else {
            panic!("expected selector");
        };
        let ValueKind::NodeRef(pkg) = x.kind else {
            panic!("expected package reference");
        };
        let GraphNode::Package(p) = built.graph.get(pkg) else {
            panic!("expected package node");
        };
        assert_eq!(p.path, "strings");
        assert_eq!(p.value, marker("strings"));
    }

    #[test]
    fn external_unit_import() {
        let mut table = PackageTable::new();
        table.add_unit("example.com/pkg", marker("pkg"));

        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(&[b.import(&[b.import_spec(None, Some("p"), r#""example.com/pkg""#)])]);
        let built = build_with(file, &table, BuildOptions::default());
        assert!(built.errors.is_empty());
        let packages: Vec<_> = (0..built.graph.len() as u32)
            .filter_map(|i| match built.graph.get(ScopeId::new(i)) {
                GraphNode::Package(p) => Some(p.path.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(packages, ["example.com/pkg"]);
    }

    #[test]
    fn missing_package() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(&[b.import(&[b.import_spec(None, None, r#""nope""#)])]);
        let built = build(file);
        assert_eq!(built.errors.len(), 1);
        assert_eq!(
            built.errors.iter().next().unwrap().message(),
            "package \"nope\" not found"
        );
        // A failed import does not fail the file.
        assert!(!built.value.is_bottom());
    }

    #[test]
    fn illformed_path() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let file = b.file(&[b.import(&[b.import_spec(None, None, "strings")])]);
        let built = build(file);
        assert_eq!(
            built.errors.iter().next().unwrap().message(),
            "illformed import spec"
        );
    }
}
