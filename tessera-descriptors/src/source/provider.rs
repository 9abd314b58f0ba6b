//! Fragment provider for source-declared packages

use super::{SourceDeclarationProvider, SourceMembers};
use crate::descriptors::{DeclarationRef, FragmentKind, PackageFragmentDescriptor};
use crate::error::{ResolveError, ResolveResult};
use crate::module::ModuleDescriptor;
use crate::name::FqName;
use crate::provider::PackageFragmentProvider;
use std::fmt;
use std::sync::{Arc, Weak};
use tessera_storage::{MemoizedFunctionToNullable, RetentionPolicy};

/// Provides one fragment per package that has source declarations
///
/// Packages that only exist because something is nested below them get no
/// fragment; they still show up in [`PackageFragmentProvider::child_names`].
pub struct SourcePackageFragmentProvider {
    declarations: Arc<dyn SourceDeclarationProvider>,
    fragments: MemoizedFunctionToNullable<FqName, Arc<PackageFragmentDescriptor>, ResolveError>,
}

impl SourcePackageFragmentProvider {
    pub fn new(
        module: &Arc<ModuleDescriptor>,
        declarations: Arc<dyn SourceDeclarationProvider>,
    ) -> Self {
        let storage = module.storage().clone();
        let module: Weak<ModuleDescriptor> = Arc::downgrade(module);
        let fragments = {
            let declarations = Arc::clone(&declarations);
            let session = storage.clone();
            storage.create_memoized_function_with_nullable_values(
                "source package fragments",
                RetentionPolicy::Retain,
                move |package: &FqName| -> ResolveResult<Option<Arc<PackageFragmentDescriptor>>> {
                    let Some(body) = declarations.package_declarations(package) else {
                        return Ok(None);
                    };
                    Ok(Some(PackageFragmentDescriptor::new(
                        package.clone(),
                        FragmentKind::Package,
                        DeclarationRef::Module(module.clone()),
                        |this| SourceMembers::scope(&session, this, package.clone(), body),
                    )))
                },
            )
        };

        Self {
            declarations,
            fragments,
        }
    }
}

impl PackageFragmentProvider for SourcePackageFragmentProvider {
    fn fragments(&self, package: &FqName) -> ResolveResult<Vec<Arc<PackageFragmentDescriptor>>> {
        Ok(self.fragments.get(package)?.into_iter().collect())
    }

    fn child_names(&self, package: &FqName) -> ResolveResult<Vec<FqName>> {
        Ok(self.declarations.sub_packages(package))
    }

    fn debug_name(&self) -> String {
        "source".to_string()
    }
}

impl fmt::Debug for SourcePackageFragmentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePackageFragmentProvider")
            .field("fragments", &self.fragments)
            .finish_non_exhaustive()
    }
}
