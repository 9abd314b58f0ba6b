//! Inventory-backed lazy member scope
//!
//! `LazyMemberScope` is the shared machinery behind source and binary scopes.
//! A [`ScopeMembers`] implementation lists the raw names it knows about and
//! turns one name into descriptors; the scope memoizes every answer per name
//! and assembles the full member list from the three name inventories.
//!
//! An inventory name that resolves to nothing is reported as
//! [`ResolveError::InternalInconsistency`]: the inventory and the resolver are
//! expected to agree, so silently dropping the name would hide a bug.

use crate::descriptors::{
    ClassDescriptor, DeclarationRef, Descriptor, FunctionDescriptor, PropertyDescriptor,
};
use crate::error::{ResolveError, ResolveResult};
use crate::name::Name;
use crate::scopes::MemberScope;
use std::sync::Arc;
use tessera_storage::{
    LazyValue, MemoizedFunction, MemoizedFunctionToNullable, RetentionPolicy, StorageManager,
};
use tracing::trace;

/// Raw name inventories and per-name resolution behind a [`LazyMemberScope`]
///
/// `container` is the declaration that owns the scope; members resolved for
/// it use it as their containing declaration.
pub trait ScopeMembers: Send + Sync + 'static {
    /// Description used in logs and error messages
    fn describe(&self) -> String;

    fn class_names(&self) -> ResolveResult<Vec<Name>>;

    /// Names with at least one callable member
    fn function_names(&self) -> ResolveResult<Vec<Name>>;

    /// Names with at least one property
    fn property_names(&self) -> ResolveResult<Vec<Name>>;

    fn resolve_class(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>>;

    fn resolve_functions(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<FunctionDescriptor>>>;

    fn resolve_properties(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<PropertyDescriptor>>>;

    fn child_package(
        &self,
        _container: &DeclarationRef,
        _name: &Name,
    ) -> ResolveResult<Option<Descriptor>> {
        Ok(None)
    }

    /// Members beyond the three inventories, appended to `all_members`
    fn extra_members(
        &self,
        _container: &DeclarationRef,
        _into: &mut Vec<Descriptor>,
    ) -> ResolveResult<()> {
        Ok(())
    }
}

struct ScopeCaches<M> {
    container: DeclarationRef,
    members: Arc<M>,
    classes: MemoizedFunctionToNullable<Name, Arc<ClassDescriptor>, ResolveError>,
    functions: MemoizedFunction<Name, Arc<[Arc<FunctionDescriptor>]>, ResolveError>,
    properties: MemoizedFunction<Name, Arc<[Arc<PropertyDescriptor>]>, ResolveError>,
}

impl<M: ScopeMembers> ScopeCaches<M> {
    fn inconsistency(&self, name: Name) -> ResolveError {
        ResolveError::InternalInconsistency {
            name,
            container: self.members.describe(),
        }
    }

    fn compute_all_members(&self) -> ResolveResult<Arc<[Descriptor]>> {
        let mut result = Vec::new();

        for name in self.members.class_names()? {
            match self.classes.get(&name)? {
                Some(class) => result.push(Descriptor::Class(class)),
                None => return Err(self.inconsistency(name)),
            }
        }

        for name in self.members.function_names()? {
            let functions = self.functions.get(&name)?;
            if functions.is_empty() {
                return Err(self.inconsistency(name));
            }
            result.extend(functions.iter().cloned().map(Descriptor::Function));
        }

        for name in self.members.property_names()? {
            let properties = self.properties.get(&name)?;
            if properties.is_empty() {
                return Err(self.inconsistency(name));
            }
            result.extend(properties.iter().cloned().map(Descriptor::Property));
        }

        self.members.extra_members(&self.container, &mut result)?;
        Ok(result.into())
    }
}

/// A member scope over a [`ScopeMembers`] inventory
pub struct LazyMemberScope<M> {
    caches: Arc<ScopeCaches<M>>,
    all_members: LazyValue<Arc<[Descriptor]>, ResolveError>,
}

impl<M: ScopeMembers> LazyMemberScope<M> {
    pub fn new(storage: &StorageManager, container: DeclarationRef, members: M) -> Self {
        let members = Arc::new(members);
        let label = members.describe();

        let classes = {
            let members = Arc::clone(&members);
            let container = container.clone();
            storage.create_memoized_function_with_nullable_values(
                format!("classifiers of {label}"),
                RetentionPolicy::Retain,
                move |name: &Name| members.resolve_class(&container, name),
            )
        };

        let functions = {
            let members = Arc::clone(&members);
            let container = container.clone();
            storage.create_memoized_function(
                format!("functions of {label}"),
                RetentionPolicy::Retain,
                move |name: &Name| -> ResolveResult<Arc<[Arc<FunctionDescriptor>]>> {
                    Ok(members.resolve_functions(&container, name)?.into())
                },
            )
        };

        let properties = {
            let members = Arc::clone(&members);
            let container = container.clone();
            storage.create_memoized_function(
                format!("properties of {label}"),
                RetentionPolicy::Retain,
                move |name: &Name| -> ResolveResult<Arc<[Arc<PropertyDescriptor>]>> {
                    Ok(members.resolve_properties(&container, name)?.into())
                },
            )
        };

        let caches = Arc::new(ScopeCaches {
            container,
            members,
            classes,
            functions,
            properties,
        });

        let all_members = {
            let caches = Arc::clone(&caches);
            storage.create_lazy_value(format!("all members of {label}"), move || {
                caches.compute_all_members()
            })
        };

        Self {
            caches,
            all_members,
        }
    }

    /// The inventory this scope is built over
    pub fn members(&self) -> &M {
        &self.caches.members
    }
}

impl<M: ScopeMembers> MemberScope for LazyMemberScope<M> {
    fn containing_declaration(&self) -> Option<Descriptor> {
        self.caches.container.upgrade()
    }

    fn classifier(&self, name: &Name) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        trace!(scope = %self.caches.members.describe(), %name, "classifier lookup");
        self.caches.classes.get(name)
    }

    fn functions(&self, name: &Name) -> ResolveResult<Vec<Arc<FunctionDescriptor>>> {
        trace!(scope = %self.caches.members.describe(), %name, "function lookup");
        Ok(self.caches.functions.get(name)?.to_vec())
    }

    fn properties(&self, name: &Name) -> ResolveResult<Vec<Arc<PropertyDescriptor>>> {
        trace!(scope = %self.caches.members.describe(), %name, "property lookup");
        Ok(self.caches.properties.get(name)?.to_vec())
    }

    fn child_package(&self, name: &Name) -> ResolveResult<Option<Descriptor>> {
        self.caches
            .members
            .child_package(&self.caches.container, name)
    }

    fn all_members(&self) -> ResolveResult<Arc<[Descriptor]>> {
        self.all_members.get()
    }

    fn debug_name(&self) -> String {
        self.caches.members.describe()
    }
}
