//! Shared state of one binary fragment provider
//!
//! All binary descriptors of a provider come from the caches here, keyed by
//! qualified name, so a class reached through its package, its outer class or
//! a direct lookup is always the same instance.
//!
//! Unreadable entries degrade to absent ones. Each is reported once, since the
//! degraded answer is cached like any other.
//!
//! Scopes refer back to the context through a `Weak` handle: the context owns
//! the descriptors, and the descriptors must not keep the context alive.

use super::members::{BinaryClassMembers, BinaryPackageMembers};
use super::{BinaryClass, BinaryClassFinder, BinaryPackage, MemberResolver};
use crate::descriptors::{
    ClassDescriptor, DeclarationRef, FragmentKind, Origin, PackageFragmentDescriptor,
};
use crate::diagnostics::{DiagnosticReporter, ResolutionDiagnostic};
use crate::error::{ResolveError, ResolveResult};
use crate::module::ModuleDescriptor;
use crate::name::FqName;
use std::sync::{Arc, Weak};
use tessera_storage::{
    MemoizedFunction, MemoizedFunctionToNullable, RetentionPolicy, StorageManager,
};
use tracing::warn;

pub(crate) struct BinaryContext {
    storage: StorageManager,
    resolver: Arc<dyn MemberResolver>,
    packages: MemoizedFunctionToNullable<FqName, Arc<BinaryPackage>, ResolveError>,
    class_data: MemoizedFunctionToNullable<FqName, Arc<BinaryClass>, ResolveError>,
    fragments: MemoizedFunction<FqName, Arc<PackageFragmentDescriptor>, ResolveError>,
    classes: MemoizedFunctionToNullable<FqName, Arc<ClassDescriptor>, ResolveError>,
}

impl BinaryContext {
    pub(crate) fn new(
        module: &Arc<ModuleDescriptor>,
        finder: Arc<dyn BinaryClassFinder>,
        resolver: Arc<dyn MemberResolver>,
        reporter: Arc<dyn DiagnosticReporter>,
    ) -> Arc<Self> {
        let storage = module.storage().clone();
        let module_name = module.name().clone();
        let module = Arc::downgrade(module);

        Arc::new_cyclic(|this: &Weak<BinaryContext>| {
            let packages = {
                let finder = Arc::clone(&finder);
                let reporter = Arc::clone(&reporter);
                let module_name = module_name.clone();
                storage.create_memoized_function_with_nullable_values(
                    "binary packages",
                    RetentionPolicy::Retain,
                    move |package: &FqName| -> ResolveResult<Option<Arc<BinaryPackage>>> {
                        match finder.find_package(package) {
                            Ok(found) => Ok(found),
                            Err(error) => {
                                warn!(module = %module_name, %package, %error, "binary package degraded to empty");
                                reporter.report(ResolutionDiagnostic::UnreadablePackage {
                                    module: module_name.clone(),
                                    package: package.clone(),
                                    reason: error.to_string(),
                                });
                                Ok(None)
                            }
                        }
                    },
                )
            };

            let class_data = storage.create_memoized_function_with_nullable_values(
                "binary class data",
                RetentionPolicy::Retain,
                move |class: &FqName| -> ResolveResult<Option<Arc<BinaryClass>>> {
                    match finder.find_class(class) {
                        Ok(found) => Ok(found),
                        Err(error) => {
                            warn!(module = %module_name, %class, %error, "binary class left out");
                            reporter.report(ResolutionDiagnostic::UnreadableClass {
                                module: module_name.clone(),
                                class: class.clone(),
                                reason: error.to_string(),
                            });
                            Ok(None)
                        }
                    }
                },
            );

            let fragments = {
                let context = this.clone();
                let session = storage.clone();
                storage.create_memoized_function(
                    "binary package fragments",
                    RetentionPolicy::Retain,
                    move |package: &FqName| -> ResolveResult<Arc<PackageFragmentDescriptor>> {
                        Ok(PackageFragmentDescriptor::new(
                            package.clone(),
                            FragmentKind::Package,
                            DeclarationRef::Module(module.clone()),
                            |fragment| {
                                BinaryPackageMembers::scope(
                                    &session,
                                    fragment,
                                    context.clone(),
                                    package.clone(),
                                )
                            },
                        ))
                    },
                )
            };

            let classes = {
                let context = this.clone();
                storage.create_memoized_function_with_nullable_values(
                    "binary classes",
                    RetentionPolicy::Retain,
                    move |class: &FqName| BinaryContext::upgrade(&context, class)?.create_class(class),
                )
            };

            BinaryContext {
                storage: storage.clone(),
                resolver,
                packages,
                class_data,
                fragments,
                classes,
            }
        })
    }

    pub(crate) fn upgrade(context: &Weak<BinaryContext>, what: &FqName) -> ResolveResult<Arc<Self>> {
        context.upgrade().ok_or_else(|| ResolveError::Disposed {
            what: format!("binary declaration {what}"),
        })
    }

    /// The package inventory; `None` if absent or unreadable
    pub(crate) fn package(&self, package: &FqName) -> ResolveResult<Option<Arc<BinaryPackage>>> {
        self.packages.get(package)
    }

    /// The class inventory; `None` if absent or unreadable
    pub(crate) fn class_data(&self, class: &FqName) -> ResolveResult<Option<Arc<BinaryClass>>> {
        self.class_data.get(class)
    }

    /// The fragment for `package`; exists for every name
    pub(crate) fn fragment(&self, package: &FqName) -> ResolveResult<Arc<PackageFragmentDescriptor>> {
        self.fragments.get(package)
    }

    pub(crate) fn class(&self, class: &FqName) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        self.classes.get(class)
    }

    pub(crate) fn resolver(&self) -> &dyn MemberResolver {
        self.resolver.as_ref()
    }

    fn create_class(self: Arc<Self>, class: &FqName) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        let Some(data) = self.class_data(class)? else {
            return Ok(None);
        };
        let (Some(parent), Some(short_name)) = (class.parent(), class.short_name()) else {
            return Ok(None);
        };

        let nested = self
            .class_data(&parent)?
            .is_some_and(|outer| outer.has_inner_class(short_name));
        let container = if nested {
            match self.class(&parent)? {
                Some(outer) => DeclarationRef::from(&outer),
                None => return Ok(None),
            }
        } else {
            DeclarationRef::from(&self.fragment(&parent)?)
        };

        let context = Arc::downgrade(&self);
        Ok(Some(ClassDescriptor::with_static_namespace(
            class.clone(),
            data.kind,
            Origin::Binary,
            container,
            |this| BinaryClassMembers::scope(&self.storage, this, context.clone(), Arc::clone(&data), false),
            |namespace| BinaryClassMembers::scope(&self.storage, namespace, context.clone(), Arc::clone(&data), true),
        )))
    }
}
