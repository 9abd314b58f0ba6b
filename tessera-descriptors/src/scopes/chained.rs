//! Ordered composition of member scopes
//!
//! Precedence rules:
//! - `classifier` and `child_package` return the first hit in scope order, so
//!   an earlier scope shadows a later one declaring the same name.
//! - `functions` and `properties` return the union of every scope, since
//!   overload resolution needs every candidate.
//! - `all_members` is the union of every scope's members.

use crate::descriptors::{
    ClassDescriptor, DeclarationRef, Descriptor, FunctionDescriptor, PropertyDescriptor,
};
use crate::error::{ResolveError, ResolveResult};
use crate::name::Name;
use crate::scopes::{extend_unique, MemberScope};
use indexmap::IndexSet;
use std::sync::Arc;
use tessera_storage::{LazyValue, StorageManager};

/// Several scopes presented as one namespace
pub struct ChainedScope {
    container: DeclarationRef,
    debug_name: String,
    scopes: Arc<[Arc<dyn MemberScope>]>,
    all_members: LazyValue<Arc<[Descriptor]>, ResolveError>,
}

impl ChainedScope {
    pub fn new(
        storage: &StorageManager,
        container: DeclarationRef,
        debug_name: impl Into<String>,
        scopes: Vec<Arc<dyn MemberScope>>,
    ) -> Self {
        let debug_name = debug_name.into();
        let scopes: Arc<[Arc<dyn MemberScope>]> = scopes.into();

        let all_members = {
            let scopes = Arc::clone(&scopes);
            storage.create_lazy_value(
                format!("all members of {debug_name}"),
                move || -> ResolveResult<Arc<[Descriptor]>> {
                    let mut members = IndexSet::new();
                    for scope in scopes.iter() {
                        members.extend(scope.all_members()?.iter().cloned());
                    }
                    Ok(members.into_iter().collect())
                },
            )
        };

        Self {
            container,
            debug_name,
            scopes,
            all_members,
        }
    }

    pub fn scopes(&self) -> &[Arc<dyn MemberScope>] {
        &self.scopes
    }
}

impl MemberScope for ChainedScope {
    fn containing_declaration(&self) -> Option<Descriptor> {
        self.container.upgrade()
    }

    fn classifier(&self, name: &Name) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        for scope in self.scopes.iter() {
            if let Some(class) = scope.classifier(name)? {
                return Ok(Some(class));
            }
        }
        Ok(None)
    }

    fn functions(&self, name: &Name) -> ResolveResult<Vec<Arc<FunctionDescriptor>>> {
        let mut result = Vec::new();
        for scope in self.scopes.iter() {
            extend_unique(&mut result, scope.functions(name)?);
        }
        Ok(result)
    }

    fn properties(&self, name: &Name) -> ResolveResult<Vec<Arc<PropertyDescriptor>>> {
        let mut result = Vec::new();
        for scope in self.scopes.iter() {
            extend_unique(&mut result, scope.properties(name)?);
        }
        Ok(result)
    }

    fn child_package(&self, name: &Name) -> ResolveResult<Option<Descriptor>> {
        for scope in self.scopes.iter() {
            if let Some(package) = scope.child_package(name)? {
                return Ok(Some(package));
            }
        }
        Ok(None)
    }

    fn all_members(&self) -> ResolveResult<Arc<[Descriptor]>> {
        self.all_members.get()
    }

    fn debug_name(&self) -> String {
        self.debug_name.clone()
    }
}
