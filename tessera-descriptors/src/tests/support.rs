//! Shared fixtures

use crate::{
    BinaryPackageFragmentProvider, DiagnosticReporter, FqName, FunctionDescriptor,
    InMemoryClassFinder, InMemorySourceDeclarations, ModuleDescriptor, Name, NullReporter,
    SourcePackageFragmentProvider,
};
use std::sync::Arc;
use tessera_storage::StorageManager;

pub fn name(text: &str) -> Name {
    Name::identifier(text)
}

pub fn fq(text: &str) -> FqName {
    FqName::new(text)
}

pub fn new_module() -> Arc<ModuleDescriptor> {
    ModuleDescriptor::new(Name::special("<main>"), &StorageManager::new("test")).unwrap()
}

/// Source provider over TOML `[[files]]`, registered with `module`
pub fn add_source(module: &Arc<ModuleDescriptor>, toml: &str) -> Arc<SourcePackageFragmentProvider> {
    let declarations = InMemorySourceDeclarations::from_toml_str(toml).unwrap();
    let provider = Arc::new(SourcePackageFragmentProvider::new(module, Arc::new(declarations)));
    module.add_fragment_provider(provider.clone()).unwrap();
    provider
}

/// Classpath provider over a TOML inventory, registered with `module`
pub fn add_binary_with_reporter(
    module: &Arc<ModuleDescriptor>,
    toml: &str,
    reporter: Arc<dyn DiagnosticReporter>,
) -> Arc<BinaryPackageFragmentProvider> {
    let finder = InMemoryClassFinder::from_toml_str(toml).unwrap();
    let provider = Arc::new(BinaryPackageFragmentProvider::new(
        module,
        Arc::new(finder),
        reporter,
    ));
    module.add_fragment_provider(provider.clone()).unwrap();
    provider
}

pub fn add_binary(module: &Arc<ModuleDescriptor>, toml: &str) -> Arc<BinaryPackageFragmentProvider> {
    add_binary_with_reporter(module, toml, Arc::new(NullReporter))
}

/// Sorted signatures of an overload group
pub fn signatures(functions: &[Arc<FunctionDescriptor>]) -> Vec<String> {
    let mut signatures: Vec<String> = functions.iter().map(|f| f.signature()).collect();
    signatures.sort();
    signatures
}

/// A classpath with a nested class and a package facade
pub const CLASSPATH: &str = r#"
[[packages]]
name = "util"
facade = "UtilKt"

[[classes]]
name = "util.UtilKt"

[[classes.methods]]
name = "max"
static = true
parameters = ["int", "int"]
return_type = "int"

[[classes.methods]]
name = "max"
static = true
parameters = ["long", "long"]
return_type = "long"

[[classes.fields]]
name = "VERSION"
type = "java.lang.String"
static = true
final = true

[[classes]]
name = "util.Box"

[[classes]]
name = "java.util.Outer"
inner_classes = ["Inner"]

[[classes.methods]]
name = "create"
static = true
return_type = "java.util.Outer"

[[classes.methods]]
name = "size"
return_type = "int"

[[classes.methods]]
name = "<init>"

[[classes.methods]]
name = "access$000"
synthetic = true

[[classes.fields]]
name = "count"
type = "int"

[[classes]]
name = "java.util.Outer.Inner"

[[classes.methods]]
name = "helper"
static = true
"#;
