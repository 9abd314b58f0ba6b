//! Package views
//!
//! A package view is what consumers see for a qualified name: the fragments
//! of every provider chained in registration order, followed by a synthetic
//! scope that resolves child packages back through the module. A view exists
//! for every name, including names no provider contributes to.

use crate::descriptors::{
    ClassDescriptor, DeclarationRef, Descriptor, FunctionDescriptor, PackageFragmentDescriptor,
    PropertyDescriptor,
};
use crate::error::{ResolveError, ResolveResult};
use crate::module::ModuleDescriptor;
use crate::name::{FqName, Name};
use crate::scopes::{ChainedScope, MemberScope};
use std::fmt;
use std::sync::{Arc, Weak};
use tessera_storage::LazyValue;
use tracing::debug;

/// The module-wide namespace for one qualified name
pub struct PackageViewDescriptor {
    module: Weak<ModuleDescriptor>,
    fq_name: FqName,
    fragments: Vec<Arc<PackageFragmentDescriptor>>,
    container: DeclarationRef,
    member_scope: Arc<dyn MemberScope>,
}

impl PackageViewDescriptor {
    /// Build the view for `fq_name`; the module caches the result
    pub(crate) fn create(module: &Arc<ModuleDescriptor>, fq_name: FqName) -> ResolveResult<Arc<Self>> {
        let container = match fq_name.parent() {
            Some(parent) => DeclarationRef::from(&module.get_package(&parent)?),
            None => DeclarationRef::from(module),
        };
        let fragments = module.package_fragments(&fq_name)?;
        debug!(module = %module.name(), package = %fq_name, fragments = fragments.len(), "creating package view");

        Ok(Arc::new_cyclic(|this| {
            let view = DeclarationRef::PackageView(this.clone());
            let mut scopes: Vec<Arc<dyn MemberScope>> = fragments
                .iter()
                .map(|fragment| Arc::clone(fragment.member_scope()))
                .collect();
            scopes.push(Arc::new(SubpackagesScope::new(module, fq_name.clone(), view.clone())));

            let member_scope = ChainedScope::new(
                module.storage(),
                view,
                format!("package {fq_name} in module {}", module.name()),
                scopes,
            );

            PackageViewDescriptor {
                module: Arc::downgrade(module),
                fq_name,
                fragments,
                container,
                member_scope: Arc::new(member_scope),
            }
        }))
    }

    pub fn name(&self) -> Name {
        self.fq_name.short_name_or_special()
    }

    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    pub fn module(&self) -> Option<Arc<ModuleDescriptor>> {
        self.module.upgrade()
    }

    /// Fragments contributing to this view, in provider order
    pub fn fragments(&self) -> &[Arc<PackageFragmentDescriptor>] {
        &self.fragments
    }

    /// Whether no provider contributes a fragment
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn member_scope(&self) -> &Arc<dyn MemberScope> {
        &self.member_scope
    }

    /// The parent package view, or the module for the root view
    pub fn containing_declaration(&self) -> Option<Descriptor> {
        self.container.upgrade()
    }
}

impl fmt::Debug for PackageViewDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageViewDescriptor")
            .field("fq_name", &self.fq_name)
            .field("fragments", &self.fragments.len())
            .finish_non_exhaustive()
    }
}

/// Child packages of a view, resolved through the module
///
/// `child_package` answers with a view for any name, whether or not a
/// provider reports it; enumeration only lists reported sub-packages.
pub struct SubpackagesScope {
    module: Weak<ModuleDescriptor>,
    fq_name: FqName,
    container: DeclarationRef,
    all_members: LazyValue<Arc<[Descriptor]>, ResolveError>,
}

fn upgrade_module(module: &Weak<ModuleDescriptor>, fq_name: &FqName) -> ResolveResult<Arc<ModuleDescriptor>> {
    module.upgrade().ok_or_else(|| ResolveError::Disposed {
        what: format!("sub-packages of {fq_name}"),
    })
}

impl SubpackagesScope {
    pub fn new(module: &Arc<ModuleDescriptor>, fq_name: FqName, container: DeclarationRef) -> Self {
        let weak = Arc::downgrade(module);
        let all_members = {
            let owner = weak.clone();
            let package = fq_name.clone();
            module.storage().create_lazy_value(
                format!("sub-packages of {fq_name}"),
                move || -> ResolveResult<Arc<[Descriptor]>> {
                    let module = upgrade_module(&owner, &package)?;
                    module
                        .sub_packages_of(&package)?
                        .iter()
                        .map(|child| module.get_package(child).map(Descriptor::PackageView))
                        .collect()
                },
            )
        };

        Self {
            module: weak,
            fq_name,
            container,
            all_members,
        }
    }
}

impl MemberScope for SubpackagesScope {
    fn containing_declaration(&self) -> Option<Descriptor> {
        self.container.upgrade()
    }

    fn classifier(&self, _name: &Name) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        Ok(None)
    }

    fn functions(&self, _name: &Name) -> ResolveResult<Vec<Arc<FunctionDescriptor>>> {
        Ok(Vec::new())
    }

    fn properties(&self, _name: &Name) -> ResolveResult<Vec<Arc<PropertyDescriptor>>> {
        Ok(Vec::new())
    }

    fn child_package(&self, name: &Name) -> ResolveResult<Option<Descriptor>> {
        let module = upgrade_module(&self.module, &self.fq_name)?;
        let view = module.get_package(&self.fq_name.child(name))?;
        Ok(Some(Descriptor::PackageView(view)))
    }

    fn all_members(&self) -> ResolveResult<Arc<[Descriptor]>> {
        self.all_members.get()
    }

    fn debug_name(&self) -> String {
        format!("sub-packages of {}", self.fq_name)
    }
}
