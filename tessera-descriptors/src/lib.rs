//! Tessera descriptors
//!
//! The semantic-resolution core: a lazily built graph of descriptors (modules,
//! packages, classes, functions, properties) merged from source declarations
//! and pre-compiled platform classes.
//!
//! ## Architecture
//!
//! - **Module**: owns the ordered fragment providers and hands out package views
//! - **Fragment providers**: source-backed and classpath-backed contributions per package
//! - **Member scopes**: lazily resolved namespaces over name inventories
//! - **Package views**: the providers' fragments chained in registration order,
//!   plus a synthetic scope for sub-packages
//!
//! Every cache lives in the module's [`tessera_storage::StorageManager`], one
//! per compilation session.

pub mod binary;
pub mod config;
pub mod descriptors;
pub mod diagnostics;
pub mod error;
pub mod module;
pub mod name;
pub mod package_view;
pub mod provider;
pub mod scopes;
pub mod source;

pub use binary::{
    BinaryClass, BinaryClassFinder, BinaryField, BinaryMethod, BinaryPackage,
    BinaryPackageFragmentProvider, InMemoryClassFinder, MemberResolver, PlatformMemberResolver,
};
pub use config::{ModuleConfiguration, PlatformClassMap};
pub use descriptors::{
    ClassDescriptor, ClassKind, DeclarationRef, Descriptor, FragmentKind, FunctionDescriptor,
    Origin, PackageFragmentDescriptor, PropertyDescriptor, TypeRef, ValueParameter,
};
pub use diagnostics::{CollectingReporter, DiagnosticReporter, NullReporter, ResolutionDiagnostic};
pub use error::{ConfigError, InventoryError, ModuleError, ResolveError, ResolveResult};
pub use module::ModuleDescriptor;
pub use name::{FqName, ImportPath, Name};
pub use package_view::{PackageViewDescriptor, SubpackagesScope};
pub use provider::{CompositePackageFragmentProvider, PackageFragmentProvider};
pub use scopes::{ChainedScope, EmptyScope, LazyMemberScope, MemberScope, ScopeMembers};
pub use source::{
    InMemorySourceDeclarations, MemberDeclarations, SourceDeclarationProvider, SourceFile,
    SourcePackageFragmentProvider,
};

#[cfg(test)]
mod tests;
