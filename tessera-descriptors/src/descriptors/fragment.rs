//! Package fragment descriptors

use super::{DeclarationRef, Descriptor};
use crate::module::ModuleDescriptor;
use crate::name::{FqName, Name};
use crate::scopes::MemberScope;
use std::fmt;
use std::sync::Arc;

/// What a fragment contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Declarations of one provider for a package
    Package,
    /// Static members of a binary class, used as a namespace
    ClassStatics,
}

/// One declaration source's contribution to a qualified name
pub struct PackageFragmentDescriptor {
    fq_name: FqName,
    kind: FragmentKind,
    container: DeclarationRef,
    member_scope: Arc<dyn MemberScope>,
}

impl PackageFragmentDescriptor {
    /// Create a fragment whose scope is built with a reference to the fragment
    pub fn new(
        fq_name: FqName,
        kind: FragmentKind,
        container: DeclarationRef,
        member_scope: impl FnOnce(DeclarationRef) -> Arc<dyn MemberScope>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| PackageFragmentDescriptor {
            member_scope: member_scope(DeclarationRef::PackageFragment(this.clone())),
            fq_name,
            kind,
            container,
        })
    }

    pub fn name(&self) -> Name {
        self.fq_name.short_name_or_special()
    }

    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn member_scope(&self) -> &Arc<dyn MemberScope> {
        &self.member_scope
    }

    /// The module for package fragments, the class for static namespaces
    pub fn containing_declaration(&self) -> Option<Descriptor> {
        self.container.upgrade()
    }

    /// The module this fragment ultimately belongs to
    pub fn module(&self) -> Option<Arc<ModuleDescriptor>> {
        let mut current = self.container.upgrade();
        while let Some(descriptor) = current {
            if let Descriptor::Module(module) = descriptor {
                return Some(module);
            }
            current = descriptor.containing_declaration();
        }
        None
    }

    pub(crate) fn is_contained_by(&self, descriptor: &Descriptor) -> bool {
        self.container.refers_to(descriptor)
    }
}

impl fmt::Debug for PackageFragmentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageFragmentDescriptor")
            .field("fq_name", &self.fq_name)
            .field("kind", &self.kind)
            .field("scope", &self.member_scope.debug_name())
            .finish()
    }
}
