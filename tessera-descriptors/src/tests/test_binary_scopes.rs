//! Classpath-backed scopes: static namespaces, facades, degradation

use super::support::{add_binary, add_binary_with_reporter, fq, name, new_module, signatures, CLASSPATH};
use crate::binary::{BinaryClass, BinaryField, BinaryMethod};
use crate::{
    BinaryPackageFragmentProvider, CollectingReporter, DeclarationRef, Descriptor, FragmentKind,
    FunctionDescriptor, InMemoryClassFinder, MemberResolver, Name, NullReporter, Origin,
    PlatformClassMap, PlatformMemberResolver, PropertyDescriptor, ResolutionDiagnostic,
    ResolveError, ResolveResult,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn test_static_scope_exposes_nested_class_only_as_namespace() {
    let module = new_module();
    let binary = add_binary(&module, CLASSPATH);

    let outer = binary.find_class(&fq("java.util.Outer")).unwrap().unwrap();
    let inner = binary.find_class(&fq("java.util.Outer.Inner")).unwrap().unwrap();
    let statics = outer.static_scope().unwrap();

    assert!(statics.classifier(&name("Inner")).unwrap().is_none());

    let namespace = statics.child_package(&name("Inner")).unwrap().unwrap();
    let Descriptor::PackageFragment(fragment) = &namespace else {
        panic!("expected a static namespace, got {namespace:?}");
    };
    assert_eq!(fragment.kind(), FragmentKind::ClassStatics);
    assert_eq!(fragment.fq_name(), &fq("java.util.Outer.Inner"));
    assert!(Arc::ptr_eq(fragment, inner.static_namespace().unwrap()));
    assert_eq!(fragment.containing_declaration(), Some(Descriptor::Class(inner.clone())));
}

#[test]
fn test_instance_scope_exposes_nested_class_as_classifier() {
    let module = new_module();
    let binary = add_binary(&module, CLASSPATH);

    let outer = binary.find_class(&fq("java.util.Outer")).unwrap().unwrap();
    let inner = binary.find_class(&fq("java.util.Outer.Inner")).unwrap().unwrap();

    let nested = outer.member_scope().classifier(&name("Inner")).unwrap().unwrap();
    assert!(Arc::ptr_eq(&nested, &inner));
    assert!(outer.member_scope().child_package(&name("Inner")).unwrap().is_none());
    assert_eq!(inner.containing_declaration(), Some(Descriptor::Class(outer)));
}

#[test]
fn test_static_and_instance_members_are_split() {
    let module = new_module();
    let binary = add_binary(&module, CLASSPATH);
    let outer = binary.find_class(&fq("java.util.Outer")).unwrap().unwrap();

    let mut instance: Vec<String> = outer
        .member_scope()
        .all_members()
        .unwrap()
        .iter()
        .map(|member| format!("{member:?}"))
        .collect();
    instance.sort();
    assert_eq!(
        instance,
        vec![
            "class java.util.Outer.Inner",
            "function size()",
            "property java.util.Outer.count",
        ]
    );

    let mut statics: Vec<String> = outer
        .static_scope()
        .unwrap()
        .all_members()
        .unwrap()
        .iter()
        .map(|member| format!("{member:?}"))
        .collect();
    statics.sort();
    assert_eq!(
        statics,
        vec!["function create()", "package fragment java.util.Outer.Inner"]
    );

    // Static members are contained by the namespace, not the class itself
    let create = outer.static_scope().unwrap().functions(&name("create")).unwrap();
    assert!(create[0].is_static());
    assert!(matches!(
        create[0].containing_declaration(),
        Some(Descriptor::PackageFragment(f)) if f.kind() == FragmentKind::ClassStatics
    ));
}

#[test]
fn test_initializers_and_synthetic_methods_are_hidden() {
    let module = new_module();
    let binary = add_binary(&module, CLASSPATH);
    let outer = binary.find_class(&fq("java.util.Outer")).unwrap().unwrap();

    assert!(outer.member_scope().functions(&name("access$000")).unwrap().is_empty());
    assert!(outer.member_scope().functions(&Name::special("<init>")).unwrap().is_empty());
}

#[test]
fn test_platform_types_are_mapped() {
    let module = new_module();
    let binary = add_binary(&module, CLASSPATH);
    let outer = binary.find_class(&fq("java.util.Outer")).unwrap().unwrap();

    let size = outer.member_scope().functions(&name("size")).unwrap();
    assert_eq!(size[0].return_type().as_str(), "lang.Int");
    assert_eq!(size[0].origin(), Origin::Binary);

    // Unmapped platform classes keep their own name
    let create = outer.static_scope().unwrap().functions(&name("create")).unwrap();
    assert_eq!(create[0].return_type().as_str(), "java.util.Outer");
}

#[test]
fn test_package_facade_provides_package_level_members() {
    let module = new_module();
    add_binary(&module, CLASSPATH);

    let view = module.get_package(&fq("util")).unwrap();
    let scope = view.member_scope();

    assert_eq!(
        signatures(&scope.functions(&name("max")).unwrap()),
        vec!["max(lang.Int, lang.Int)", "max(lang.Long, lang.Long)"]
    );

    let version = scope.properties(&name("VERSION")).unwrap();
    assert_eq!(version.len(), 1);
    assert_eq!(version[0].type_ref().as_str(), "lang.String");
    assert!(!version[0].is_mutable());

    // The facade itself is not a classifier of the package
    assert!(scope.classifier(&name("UtilKt")).unwrap().is_none());
    assert!(scope.classifier(&name("Box")).unwrap().is_some());
}

#[test]
fn test_class_identity_is_shared_across_paths() {
    let module = new_module();
    let binary = add_binary(&module, CLASSPATH);

    let direct = binary.find_class(&fq("util.Box")).unwrap().unwrap();
    let view = module.get_package(&fq("util")).unwrap();
    let through_view = view.member_scope().classifier(&name("Box")).unwrap().unwrap();

    assert!(Arc::ptr_eq(&direct, &through_view));

    // The container is the provider's fragment, shared by the view
    let container = direct.containing_declaration().unwrap();
    assert_eq!(container, Descriptor::PackageFragment(view.fragments()[0].clone()));
}

#[test]
fn test_unreadable_package_degrades_to_empty_fragment() {
    let module = new_module();
    let reporter = Arc::new(CollectingReporter::new());
    add_binary_with_reporter(
        &module,
        r#"
unreadable = ["broken"]

[[classes]]
name = "broken.Thing"

[[classes]]
name = "fine.Thing"
"#,
        reporter.clone(),
    );

    let broken = module.get_package(&fq("broken")).unwrap();
    assert_eq!(broken.fragments().len(), 1);
    assert!(broken.member_scope().all_members().unwrap().is_empty());
    assert!(broken.member_scope().classifier(&name("Thing")).unwrap().is_none());

    // The rest of the classpath is unaffected
    let fine = module.get_package(&fq("fine")).unwrap();
    assert!(fine.member_scope().classifier(&name("Thing")).unwrap().is_some());

    // Reported once, even though the package was consulted several times
    assert_eq!(
        reporter.diagnostics(),
        vec![ResolutionDiagnostic::UnreadablePackage {
            module: Name::special("<main>"),
            package: fq("broken"),
            reason: "Cannot read `broken`: entry is marked unreadable".to_string(),
        }]
    );
}

/// A resolver that cannot resolve anything, to simulate a reader bug
struct BrokenResolver;

impl MemberResolver for BrokenResolver {
    fn resolve_method(
        &self,
        _container: &DeclarationRef,
        _owner: &BinaryClass,
        _method: &BinaryMethod,
    ) -> ResolveResult<Option<Arc<FunctionDescriptor>>> {
        Ok(None)
    }

    fn resolve_field(
        &self,
        _container: &DeclarationRef,
        _owner: &BinaryClass,
        _field: &BinaryField,
    ) -> ResolveResult<Option<Arc<PropertyDescriptor>>> {
        Ok(None)
    }
}

#[test]
fn test_unresolvable_inventory_entry_is_internal_inconsistency() {
    let module = new_module();
    let finder = InMemoryClassFinder::from_toml_str(CLASSPATH).unwrap();
    let binary = Arc::new(BinaryPackageFragmentProvider::with_resolver(
        &module,
        Arc::new(finder),
        Arc::new(BrokenResolver),
        Arc::new(NullReporter),
    ));
    module.add_fragment_provider(binary.clone()).unwrap();

    let outer = binary.find_class(&fq("java.util.Outer")).unwrap().unwrap();

    let error = outer.member_scope().functions(&name("size")).unwrap_err();
    assert!(matches!(
        &error,
        ResolveError::InternalInconsistency { name: missing, container }
            if missing.as_str() == "size" && container.contains("java.util.Outer")
    ));

    let error = outer.member_scope().all_members().unwrap_err();
    assert!(matches!(error, ResolveError::InternalInconsistency { .. }));
}

/// Resolves everything except overloads taking a `long`
struct NoLongOverloads;

impl MemberResolver for NoLongOverloads {
    fn resolve_method(
        &self,
        container: &DeclarationRef,
        owner: &BinaryClass,
        method: &BinaryMethod,
    ) -> ResolveResult<Option<Arc<FunctionDescriptor>>> {
        if method.parameters.iter().any(|parameter| parameter.as_str() == "long") {
            return Ok(None);
        }
        PlatformMemberResolver::new(PlatformClassMap::builtin().clone())
            .resolve_method(container, owner, method)
    }

    fn resolve_field(
        &self,
        container: &DeclarationRef,
        owner: &BinaryClass,
        field: &BinaryField,
    ) -> ResolveResult<Option<Arc<PropertyDescriptor>>> {
        PlatformMemberResolver::new(PlatformClassMap::builtin().clone())
            .resolve_field(container, owner, field)
    }
}

#[test]
fn test_one_unresolvable_overload_fails_the_whole_group() {
    let module = new_module();
    let finder = InMemoryClassFinder::from_toml_str(CLASSPATH).unwrap();
    let binary = Arc::new(BinaryPackageFragmentProvider::with_resolver(
        &module,
        Arc::new(finder),
        Arc::new(NoLongOverloads),
        Arc::new(NullReporter),
    ));
    module.add_fragment_provider(binary).unwrap();

    let scope = Arc::clone(module.get_package(&fq("util")).unwrap().member_scope());

    let error = scope.functions(&name("max")).unwrap_err();
    assert!(matches!(
        &error,
        ResolveError::InternalInconsistency { name: missing, .. } if missing.as_str() == "max"
    ));
    assert!(scope.all_members().is_err());

    // Members the resolver handles are unaffected
    assert_eq!(scope.properties(&name("VERSION")).unwrap().len(), 1);
}

#[test]
fn test_unreadable_class_is_left_out_of_its_package() {
    let module = new_module();
    let reporter = Arc::new(CollectingReporter::new());
    add_binary_with_reporter(
        &module,
        r#"
unreadable = ["lib.Broken"]

[[classes]]
name = "lib.Broken"

[[classes]]
name = "lib.Fine"
"#,
        reporter.clone(),
    );

    let lib = module.get_package(&fq("lib")).unwrap();
    let members: Vec<String> = lib
        .member_scope()
        .all_members()
        .unwrap()
        .iter()
        .map(|member| format!("{member:?}"))
        .collect();
    assert_eq!(members, vec!["class lib.Fine"]);
    assert!(lib.member_scope().classifier(&name("Broken")).unwrap().is_none());
    assert!(lib.member_scope().classifier(&name("Fine")).unwrap().is_some());

    assert_eq!(
        reporter.diagnostics(),
        vec![ResolutionDiagnostic::UnreadableClass {
            module: Name::special("<main>"),
            class: fq("lib.Broken"),
            reason: "Cannot read `lib.Broken`: entry is marked unreadable".to_string(),
        }]
    );
    assert_eq!(reporter.diagnostics()[0].module(), &Name::special("<main>"));
}

#[test]
fn test_unreadable_nested_class_is_left_out_of_its_outer_class() {
    let module = new_module();
    let reporter = Arc::new(CollectingReporter::new());
    let binary = add_binary_with_reporter(
        &module,
        r#"
unreadable = ["lib.Outer.Hidden"]

[[classes]]
name = "lib.Outer"
inner_classes = ["Hidden", "Shown"]

[[classes]]
name = "lib.Outer.Hidden"

[[classes]]
name = "lib.Outer.Shown"
"#,
        reporter.clone(),
    );

    let outer = binary.find_class(&fq("lib.Outer")).unwrap().unwrap();
    let nested: Vec<String> = outer
        .member_scope()
        .all_members()
        .unwrap()
        .iter()
        .map(|member| format!("{member:?}"))
        .collect();
    assert_eq!(nested, vec!["class lib.Outer.Shown"]);

    let statics = outer.static_scope().unwrap();
    assert!(statics.child_package(&name("Hidden")).unwrap().is_none());
    assert_eq!(statics.all_members().unwrap().len(), 1);
    assert_eq!(reporter.len(), 1);
}

#[test]
fn test_lookups_fail_after_module_is_dropped() {
    let module = new_module();
    let binary = add_binary(&module, CLASSPATH);
    let outer = binary.find_class(&fq("java.util.Outer")).unwrap().unwrap();

    drop(binary);
    drop(module);

    let error = outer.member_scope().functions(&name("size")).unwrap_err();
    assert!(matches!(error, ResolveError::Disposed { .. }));
    assert!(outer.containing_declaration().is_none());
}

#[test]
fn test_classpath_is_read_lazily_and_once() {
    let module = new_module();
    let finder = Arc::new(InMemoryClassFinder::from_toml_str(CLASSPATH).unwrap());
    let binary = Arc::new(BinaryPackageFragmentProvider::new(
        &module,
        finder.clone(),
        Arc::new(NullReporter),
    ));
    module.add_fragment_provider(binary).unwrap();

    // Creating a fragment does not touch the classpath
    let view = module.get_package(&fq("util")).unwrap();
    assert_eq!(finder.lookups(), 0);

    view.member_scope().all_members().unwrap();
    let after_first = finder.lookups();
    assert!(after_first > 0);

    view.member_scope().classifier(&name("Box")).unwrap();
    view.member_scope().functions(&name("max")).unwrap();
    assert_eq!(finder.lookups(), after_first);
}
