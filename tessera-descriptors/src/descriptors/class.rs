//! Class descriptors

use super::{DeclarationRef, Descriptor, FragmentKind, Origin, PackageFragmentDescriptor};
use crate::name::{FqName, Name};
use crate::scopes::MemberScope;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Kind of a classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
    Object,
}

/// A class, interface or other classifier
///
/// Classes read from binaries also own a *static namespace*: a package-like
/// fragment whose scope holds the static members and exposes nested classes
/// as further namespaces. The instance scope exposes nested classes as
/// ordinary classifiers instead.
pub struct ClassDescriptor {
    name: Name,
    fq_name: FqName,
    kind: ClassKind,
    origin: Origin,
    container: DeclarationRef,
    member_scope: Arc<dyn MemberScope>,
    static_namespace: Option<Arc<PackageFragmentDescriptor>>,
}

impl ClassDescriptor {
    /// Create a class whose scope is built with a reference to the class itself
    pub fn new(
        fq_name: FqName,
        kind: ClassKind,
        origin: Origin,
        container: DeclarationRef,
        member_scope: impl FnOnce(DeclarationRef) -> Arc<dyn MemberScope>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| {
            let member_scope = member_scope(DeclarationRef::Class(this.clone()));
            ClassDescriptor {
                name: fq_name.short_name_or_special(),
                fq_name,
                kind,
                origin,
                container,
                member_scope,
                static_namespace: None,
            }
        })
    }

    /// Create a class that also owns a static namespace
    ///
    /// `static_scope` receives a reference to the namespace fragment, which is
    /// the container of the static members.
    pub fn with_static_namespace(
        fq_name: FqName,
        kind: ClassKind,
        origin: Origin,
        container: DeclarationRef,
        member_scope: impl FnOnce(DeclarationRef) -> Arc<dyn MemberScope>,
        static_scope: impl FnOnce(DeclarationRef) -> Arc<dyn MemberScope>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| {
            let class_ref = DeclarationRef::Class(this.clone());
            let member_scope = member_scope(class_ref.clone());
            let static_namespace = PackageFragmentDescriptor::new(
                fq_name.clone(),
                FragmentKind::ClassStatics,
                class_ref,
                static_scope,
            );
            ClassDescriptor {
                name: fq_name.short_name_or_special(),
                fq_name,
                kind,
                origin,
                container,
                member_scope,
                static_namespace: Some(static_namespace),
            }
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Instance members and nested classifiers
    pub fn member_scope(&self) -> &Arc<dyn MemberScope> {
        &self.member_scope
    }

    pub fn static_namespace(&self) -> Option<&Arc<PackageFragmentDescriptor>> {
        self.static_namespace.as_ref()
    }

    /// Static members, with nested classes exposed as namespaces
    pub fn static_scope(&self) -> Option<&Arc<dyn MemberScope>> {
        self.static_namespace
            .as_ref()
            .map(|namespace| namespace.member_scope())
    }

    pub fn containing_declaration(&self) -> Option<Descriptor> {
        self.container.upgrade()
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("fq_name", &self.fq_name)
            .field("kind", &self.kind)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
