//! Module descriptor
//!
//! The module is the root of the descriptor graph. It owns the ordered list of
//! fragment providers and hands out package views. Setup happens in a fixed
//! order: create the module, configure it, register providers; the first
//! package query seals the provider list.

use crate::config::{ModuleConfiguration, PlatformClassMap};
use crate::descriptors::{DeclarationRef, Descriptor, PackageFragmentDescriptor};
use crate::error::{ModuleError, ResolveError, ResolveResult};
use crate::name::{FqName, ImportPath, Name};
use crate::package_view::PackageViewDescriptor;
use crate::provider::{CompositePackageFragmentProvider, PackageFragmentProvider};
use indexmap::IndexSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, Weak};
use tessera_storage::{MemoizedFunction, RetentionPolicy, StorageManager};
use tracing::debug;

/// A unit of compilation: one namespace assembled from several providers
pub struct ModuleDescriptor {
    name: Name,
    this: Weak<ModuleDescriptor>,
    storage: StorageManager,
    providers: RwLock<Vec<Arc<dyn PackageFragmentProvider>>>,
    sealed: AtomicBool,
    configuration: OnceLock<ModuleConfiguration>,
    root_package: OnceLock<Arc<PackageFragmentDescriptor>>,
    packages: MemoizedFunction<FqName, Arc<PackageViewDescriptor>, ResolveError>,
}

impl ModuleDescriptor {
    /// Create a module; its name must be special, like `<main>`
    pub fn new(name: Name, storage: &StorageManager) -> Result<Arc<Self>, ModuleError> {
        if !name.is_special() {
            return Err(ModuleError::InvalidModuleName { name });
        }

        Ok(Arc::new_cyclic(|this: &Weak<ModuleDescriptor>| {
            let module = this.clone();
            let packages = storage.create_memoized_function(
                format!("package views of {name}"),
                RetentionPolicy::Retain,
                move |fq_name: &FqName| {
                    let module = module.upgrade().ok_or_else(|| ResolveError::Disposed {
                        what: format!("package view {fq_name}"),
                    })?;
                    PackageViewDescriptor::create(&module, fq_name.clone())
                },
            );

            ModuleDescriptor {
                name,
                this: this.clone(),
                storage: storage.clone(),
                providers: RwLock::new(Vec::new()),
                sealed: AtomicBool::new(false),
                configuration: OnceLock::new(),
                root_package: OnceLock::new(),
                packages,
            }
        }))
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The session every cache of this module belongs to
    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    /// Non-owning reference for descriptors contained by this module
    pub fn as_declaration_ref(&self) -> DeclarationRef {
        DeclarationRef::Module(self.this.clone())
    }

    pub fn set_configuration(&self, configuration: ModuleConfiguration) -> Result<(), ModuleError> {
        self.configuration
            .set(configuration)
            .map_err(|_| ModuleError::ConfigurationAlreadySet {
                module: self.name.clone(),
            })
    }

    pub fn configuration(&self) -> Option<&ModuleConfiguration> {
        self.configuration.get()
    }

    /// Implicit imports; empty until the module is configured
    pub fn default_imports(&self) -> &[ImportPath] {
        self.configuration
            .get()
            .map(|configuration| configuration.default_imports.as_slice())
            .unwrap_or_default()
    }

    /// The configured platform class map, or the built-in one
    pub fn platform_class_map(&self) -> &PlatformClassMap {
        match self.configuration.get() {
            Some(configuration) => &configuration.platform_classes,
            None => PlatformClassMap::builtin(),
        }
    }

    /// Set the fragment that holds the module's own root declarations
    pub fn set_root_package(&self, fragment: Arc<PackageFragmentDescriptor>) -> Result<(), ModuleError> {
        let owned = self
            .this
            .upgrade()
            .is_some_and(|this| fragment.is_contained_by(&Descriptor::Module(this)));
        if !owned {
            return Err(ModuleError::ForeignRootPackage {
                module: self.name.clone(),
                fragment: fragment.fq_name().clone(),
            });
        }
        self.root_package
            .set(fragment)
            .map_err(|_| ModuleError::RootPackageAlreadySet {
                module: self.name.clone(),
            })
    }

    pub fn root_package(&self) -> Option<&Arc<PackageFragmentDescriptor>> {
        self.root_package.get()
    }

    /// Register a provider; later providers are shadowed by earlier ones
    pub fn add_fragment_provider(
        &self,
        provider: Arc<dyn PackageFragmentProvider>,
    ) -> Result<(), ModuleError> {
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        // Sealing takes the read lock, so it cannot interleave with this check.
        if self.sealed.load(Ordering::Acquire) {
            return Err(ModuleError::ProvidersSealed {
                module: self.name.clone(),
            });
        }
        debug!(module = %self.name, provider = %provider.debug_name(), "registered fragment provider");
        providers.push(provider);
        Ok(())
    }

    /// The registered providers, as one composite provider
    ///
    /// Calling this seals the provider list.
    pub fn package_fragment_provider(&self) -> CompositePackageFragmentProvider {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        if !self.sealed.swap(true, Ordering::AcqRel) {
            debug!(module = %self.name, providers = providers.len(), "fragment providers sealed");
        }
        CompositePackageFragmentProvider::new(providers.clone())
    }

    /// Fragments of every provider for `package`, in registration order
    pub fn package_fragments(
        &self,
        package: &FqName,
    ) -> ResolveResult<Vec<Arc<PackageFragmentDescriptor>>> {
        self.package_fragment_provider().fragments(package)
    }

    /// Child packages of `package` reported by any provider
    pub fn sub_packages_of(&self, package: &FqName) -> ResolveResult<IndexSet<FqName>> {
        self.package_fragment_provider().child_name_set(package)
    }

    /// The package view for `package`; one instance per name
    pub fn get_package(&self, package: &FqName) -> ResolveResult<Arc<PackageViewDescriptor>> {
        self.packages.get(package)
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("session", &self.storage.name())
            .field("sealed", &self.sealed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
