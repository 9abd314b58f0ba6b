//! Module setup rules and configuration

use super::support::{add_binary, add_source, fq, name, new_module};
use crate::{
    ConfigError, EmptyScope, FragmentKind, ImportPath, ModuleConfiguration, ModuleDescriptor,
    ModuleError, Name, PackageFragmentDescriptor, PlatformClassMap, TypeRef,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tessera_storage::StorageManager;

fn empty_root_fragment(module: &Arc<ModuleDescriptor>) -> Arc<PackageFragmentDescriptor> {
    PackageFragmentDescriptor::new(
        crate::FqName::root(),
        FragmentKind::Package,
        module.as_declaration_ref(),
        |container| Arc::new(EmptyScope::new(container)),
    )
}

#[test]
fn test_module_name_must_be_special() {
    let storage = StorageManager::new("test");
    let error = ModuleDescriptor::new(name("main"), &storage).unwrap_err();

    assert_eq!(error, ModuleError::InvalidModuleName { name: name("main") });
    assert!(ModuleDescriptor::new(Name::special("<main>"), &storage).is_ok());
}

#[test]
fn test_configuration_is_set_once() {
    let module = new_module();
    assert!(module.configuration().is_none());
    assert!(module.default_imports().is_empty());

    module.set_configuration(ModuleConfiguration::default()).unwrap();
    let imports: Vec<String> = module.default_imports().iter().map(ToString::to_string).collect();
    assert_eq!(imports, vec!["lang.*", "collections.*"]);

    let again = module.set_configuration(ModuleConfiguration::default());
    assert_eq!(
        again,
        Err(ModuleError::ConfigurationAlreadySet {
            module: Name::special("<main>")
        })
    );
}

#[test]
fn test_unconfigured_module_uses_builtin_platform_classes() {
    let module = new_module();
    let map = module.platform_class_map();

    assert_eq!(map, PlatformClassMap::builtin());
    assert_eq!(map.language_class(&fq("java.lang.String")), Some(&fq("lang.String")));
    assert_eq!(map.map_type(&TypeRef::new("int")), TypeRef::new("lang.Int"));
    assert_eq!(map.map_type(&TypeRef::new("app.Thing")), TypeRef::new("app.Thing"));
}

#[test]
fn test_configuration_from_toml() {
    let configuration = ModuleConfiguration::from_toml_str(
        r#"
default_imports = ["std.*", "io.File"]

[platform_classes]
"java.lang.String" = "std.Text"
"#,
    )
    .unwrap();

    assert_eq!(
        configuration.default_imports,
        vec![ImportPath::from("std.*"), ImportPath::from("io.File")]
    );
    assert_eq!(configuration.platform_classes.len(), 1);

    let module = new_module();
    module.set_configuration(configuration).unwrap();
    assert_eq!(
        module.platform_class_map().map_type(&TypeRef::new("java.lang.String")),
        TypeRef::new("std.Text")
    );
}

#[test]
fn test_configuration_defaults_apply_to_missing_keys() {
    let configuration = ModuleConfiguration::from_toml_str("").unwrap();
    assert_eq!(configuration, ModuleConfiguration::default());
}

#[test]
fn test_invalid_configuration_is_reported() {
    let error = ModuleConfiguration::from_toml_str("default_imports = 1").unwrap_err();
    let ConfigError::Invalid { what, .. } = error;
    assert_eq!(what, "module configuration");
}

#[test]
fn test_root_package_is_set_once() {
    let module = new_module();
    let fragment = empty_root_fragment(&module);

    module.set_root_package(Arc::clone(&fragment)).unwrap();
    assert!(Arc::ptr_eq(module.root_package().unwrap(), &fragment));

    let again = module.set_root_package(empty_root_fragment(&module));
    assert_eq!(
        again,
        Err(ModuleError::RootPackageAlreadySet {
            module: Name::special("<main>")
        })
    );
}

#[test]
fn test_root_package_must_belong_to_the_module() {
    let module = new_module();
    let other = new_module();

    let result = module.set_root_package(empty_root_fragment(&other));
    assert_eq!(
        result,
        Err(ModuleError::ForeignRootPackage {
            module: Name::special("<main>"),
            fragment: crate::FqName::root(),
        })
    );
    assert!(module.root_package().is_none());
}

#[test]
fn test_providers_are_sealed_by_the_first_query() {
    let module = new_module();
    add_source(&module, "");

    module.get_package(&fq("app")).unwrap();

    let finder = crate::InMemoryClassFinder::from_toml_str("").unwrap();
    let late = crate::BinaryPackageFragmentProvider::new(
        &module,
        Arc::new(finder),
        Arc::new(crate::NullReporter),
    );
    assert_eq!(
        module.add_fragment_provider(Arc::new(late)),
        Err(ModuleError::ProvidersSealed {
            module: Name::special("<main>")
        })
    );
    assert_eq!(module.package_fragment_provider().providers().len(), 1);
}

#[test]
fn test_provider_order_is_registration_order() {
    let module = new_module();
    add_source(&module, "");
    add_binary(&module, "");

    let names: Vec<String> = module
        .package_fragment_provider()
        .providers()
        .iter()
        .map(|provider| provider.debug_name())
        .collect();
    assert_eq!(names, vec!["source", "binary"]);
}
