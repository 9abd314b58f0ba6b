//! Package fragment providers
//!
//! A provider answers, for any qualified name, which fragments one declaration
//! source contributes to it and which packages are nested directly below it.
//! Several providers may contribute to the same name; none is authoritative.

use crate::descriptors::PackageFragmentDescriptor;
use crate::error::ResolveResult;
use crate::name::FqName;
use indexmap::IndexSet;
use std::sync::Arc;

/// Source of package fragments
pub trait PackageFragmentProvider: Send + Sync {
    /// Fragments for `package`, possibly none
    fn fragments(&self, package: &FqName) -> ResolveResult<Vec<Arc<PackageFragmentDescriptor>>>;

    /// Qualified names of the packages directly nested under `package`
    fn child_names(&self, package: &FqName) -> ResolveResult<Vec<FqName>>;

    fn debug_name(&self) -> String;
}

/// Providers queried in registration order
#[derive(Clone, Default)]
pub struct CompositePackageFragmentProvider {
    providers: Vec<Arc<dyn PackageFragmentProvider>>,
}

impl CompositePackageFragmentProvider {
    pub fn new(providers: Vec<Arc<dyn PackageFragmentProvider>>) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &[Arc<dyn PackageFragmentProvider>] {
        &self.providers
    }

    /// Child names across all providers, de-duplicated in first-seen order
    pub fn child_name_set(&self, package: &FqName) -> ResolveResult<IndexSet<FqName>> {
        let mut names = IndexSet::new();
        for provider in &self.providers {
            names.extend(provider.child_names(package)?);
        }
        Ok(names)
    }
}

impl PackageFragmentProvider for CompositePackageFragmentProvider {
    fn fragments(&self, package: &FqName) -> ResolveResult<Vec<Arc<PackageFragmentDescriptor>>> {
        let mut fragments = Vec::new();
        for provider in &self.providers {
            fragments.extend(provider.fragments(package)?);
        }
        Ok(fragments)
    }

    fn child_names(&self, package: &FqName) -> ResolveResult<Vec<FqName>> {
        Ok(self.child_name_set(package)?.into_iter().collect())
    }

    fn debug_name(&self) -> String {
        let names = self
            .providers
            .iter()
            .map(|provider| provider.debug_name())
            .collect::<Vec<_>>()
            .join(", ");
        format!("composite [{names}]")
    }
}
