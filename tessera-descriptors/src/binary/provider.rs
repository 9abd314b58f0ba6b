//! Fragment provider for the classpath

use super::context::BinaryContext;
use super::{BinaryClassFinder, MemberResolver, PlatformMemberResolver};
use crate::descriptors::{ClassDescriptor, PackageFragmentDescriptor};
use crate::diagnostics::DiagnosticReporter;
use crate::error::ResolveResult;
use crate::module::ModuleDescriptor;
use crate::name::FqName;
use crate::provider::PackageFragmentProvider;
use std::fmt;
use std::sync::Arc;

/// Provides a fragment for every qualified name
///
/// Having a fragment is cheap and total; whether the fragment has members is
/// decided lazily by reading the classpath. A package that cannot be read
/// yields an empty fragment and a diagnostic.
pub struct BinaryPackageFragmentProvider {
    context: Arc<BinaryContext>,
}

impl BinaryPackageFragmentProvider {
    /// A provider mapping platform types through the module's platform class map
    ///
    /// Configure the module before creating its providers.
    pub fn new(
        module: &Arc<ModuleDescriptor>,
        finder: Arc<dyn BinaryClassFinder>,
        reporter: Arc<dyn DiagnosticReporter>,
    ) -> Self {
        let resolver = PlatformMemberResolver::new(module.platform_class_map().clone());
        Self::with_resolver(module, finder, Arc::new(resolver), reporter)
    }

    pub fn with_resolver(
        module: &Arc<ModuleDescriptor>,
        finder: Arc<dyn BinaryClassFinder>,
        resolver: Arc<dyn MemberResolver>,
        reporter: Arc<dyn DiagnosticReporter>,
    ) -> Self {
        Self {
            context: BinaryContext::new(module, finder, resolver, reporter),
        }
    }

    /// The class descriptor for a binary class, nested or top-level
    pub fn find_class(&self, class: &FqName) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        self.context.class(class)
    }
}

impl PackageFragmentProvider for BinaryPackageFragmentProvider {
    fn fragments(&self, package: &FqName) -> ResolveResult<Vec<Arc<PackageFragmentDescriptor>>> {
        Ok(vec![self.context.fragment(package)?])
    }

    fn child_names(&self, package: &FqName) -> ResolveResult<Vec<FqName>> {
        Ok(self
            .context
            .package(package)?
            .map(|package| package.sub_packages.clone())
            .unwrap_or_default())
    }

    fn debug_name(&self) -> String {
        "binary".to_string()
    }
}

impl fmt::Debug for BinaryPackageFragmentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryPackageFragmentProvider")
            .finish_non_exhaustive()
    }
}
