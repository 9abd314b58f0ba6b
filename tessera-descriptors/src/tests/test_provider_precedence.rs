//! Precedence and union rules when several providers contribute to a package

use super::support::{add_binary, add_source, fq, name, new_module, signatures, CLASSPATH};
use crate::{ClassKind, Descriptor, Origin, PackageFragmentProvider};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const FIRST: &str = r#"
[[files]]
package = "a.b"

[[files.classes]]
name = "Foo"

[[files.functions]]
name = "f"
parameters = [{ name = "x", type = "Int" }]

[[files.properties]]
name = "limit"
type = "Int"

[[files]]
package = "a.b.c"
"#;

const SECOND: &str = r#"
[[files]]
package = "a.b"

[[files.classes]]
name = "Foo"
kind = "interface"

[[files.functions]]
name = "f"
parameters = [{ name = "s", type = "String" }]

[[files.properties]]
name = "limit"
type = "Long"

[[files]]
package = "a.b.c"

[[files]]
package = "a.b.d"
"#;

#[test]
fn test_first_registered_provider_wins_classifier() {
    let module = new_module();
    let first = add_source(&module, FIRST);
    let _second = add_source(&module, SECOND);

    let view = module.get_package(&fq("a.b")).unwrap();
    let merged = view.member_scope().classifier(&name("Foo")).unwrap().unwrap();

    let own = first.fragments(&fq("a.b")).unwrap();
    let expected = own[0].member_scope().classifier(&name("Foo")).unwrap().unwrap();
    assert!(Arc::ptr_eq(&merged, &expected));
}

#[test]
fn test_registration_order_decides_shadowing() {
    let module = new_module();
    let second = add_source(&module, SECOND);
    let _first = add_source(&module, FIRST);

    let view = module.get_package(&fq("a.b")).unwrap();
    let merged = view.member_scope().classifier(&name("Foo")).unwrap().unwrap();

    let own = second.fragments(&fq("a.b")).unwrap();
    let expected = own[0].member_scope().classifier(&name("Foo")).unwrap().unwrap();
    assert!(Arc::ptr_eq(&merged, &expected));
    assert_eq!(merged.kind(), ClassKind::Interface);
}

#[test]
fn test_functions_are_unioned_across_providers() {
    let module = new_module();
    add_source(&module, FIRST);
    add_source(&module, SECOND);

    let view = module.get_package(&fq("a.b")).unwrap();
    let functions = view.member_scope().functions(&name("f")).unwrap();

    assert_eq!(signatures(&functions), vec!["f(Int)", "f(String)"]);
}

#[test]
fn test_properties_are_unioned_across_providers() {
    let module = new_module();
    add_source(&module, FIRST);
    add_source(&module, SECOND);

    let view = module.get_package(&fq("a.b")).unwrap();
    let mut types: Vec<String> = view
        .member_scope()
        .properties(&name("limit"))
        .unwrap()
        .iter()
        .map(|p| p.type_ref().to_string())
        .collect();
    types.sort();

    assert_eq!(types, vec!["Int", "Long"]);
}

#[test]
fn test_sub_packages_are_unioned_and_deduplicated() {
    let forward = new_module();
    add_source(&forward, FIRST);
    add_source(&forward, SECOND);

    let backward = new_module();
    add_source(&backward, SECOND);
    add_source(&backward, FIRST);

    for module in [forward, backward] {
        let mut children: Vec<String> = module
            .sub_packages_of(&fq("a.b"))
            .unwrap()
            .iter()
            .map(|child| child.to_string())
            .collect();
        children.sort();
        assert_eq!(children, vec!["a.b.c", "a.b.d"]);
    }
}

#[test]
fn test_source_shadows_binary_class_with_same_name() {
    let module = new_module();
    add_source(
        &module,
        r#"
[[files]]
package = "util"

[[files.classes]]
name = "Box"
"#,
    );
    add_binary(&module, CLASSPATH);

    let view = module.get_package(&fq("util")).unwrap();
    let scope = view.member_scope();

    let class = scope.classifier(&name("Box")).unwrap().unwrap();
    assert_eq!(class.origin(), Origin::Source);

    // Binary-only members are still visible through the same view
    assert_eq!(
        signatures(&scope.functions(&name("max")).unwrap()),
        vec!["max(lang.Int, lang.Int)", "max(lang.Long, lang.Long)"]
    );

    // Both classes named Box are enumerated; lookups only ever see the first
    let boxes = scope
        .all_members()
        .unwrap()
        .iter()
        .filter(|member| matches!(member, Descriptor::Class(c) if c.name() == &name("Box")))
        .count();
    assert_eq!(boxes, 2);
}

#[test]
fn test_composite_provider_concatenates_in_order() {
    let module = new_module();
    add_source(&module, FIRST);
    add_source(&module, SECOND);

    let composite = module.package_fragment_provider();
    assert_eq!(composite.providers().len(), 2);

    let fragments = module.package_fragments(&fq("a.b")).unwrap();
    assert_eq!(fragments.len(), 2);
    assert_eq!(module.package_fragments(&fq("a.b.d")).unwrap().len(), 1);
    assert!(module.package_fragments(&fq("nowhere")).unwrap().is_empty());
}
