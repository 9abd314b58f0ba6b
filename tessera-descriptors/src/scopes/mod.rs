//! Member scopes
//!
//! A member scope is a queryable namespace: classifiers, overload groups of
//! functions, properties, child packages, and a full enumeration. Scopes are
//! shared between threads and compute everything lazily through the session's
//! storage manager.

mod chained;
mod lazy;

pub use chained::ChainedScope;
pub use lazy::{LazyMemberScope, ScopeMembers};

use crate::descriptors::{
    ClassDescriptor, DeclarationRef, Descriptor, FunctionDescriptor, PropertyDescriptor,
};
use crate::error::ResolveResult;
use crate::name::Name;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A namespace of declarations
///
/// Absence is an answer, not an error: lookups return `None` or an empty
/// collection. Errors are reserved for cancellation, unreadable inventories
/// and internal inconsistencies.
pub trait MemberScope: Send + Sync {
    /// The descriptor that owns this scope
    fn containing_declaration(&self) -> Option<Descriptor>;

    fn classifier(&self, name: &Name) -> ResolveResult<Option<Arc<ClassDescriptor>>>;

    /// Every function called `name`; never narrowed to a single candidate
    fn functions(&self, name: &Name) -> ResolveResult<Vec<Arc<FunctionDescriptor>>>;

    fn properties(&self, name: &Name) -> ResolveResult<Vec<Arc<PropertyDescriptor>>>;

    /// A nested namespace: a sub-package view, or a class static namespace
    fn child_package(&self, name: &Name) -> ResolveResult<Option<Descriptor>>;

    /// Every member of the scope, computed once
    fn all_members(&self) -> ResolveResult<Arc<[Descriptor]>>;

    /// Human-readable description for logs and errors
    fn debug_name(&self) -> String;
}

impl fmt::Debug for dyn MemberScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberScope({})", self.debug_name())
    }
}

/// A scope with no members
pub struct EmptyScope {
    container: DeclarationRef,
}

impl EmptyScope {
    pub fn new(container: DeclarationRef) -> Self {
        Self { container }
    }
}

impl MemberScope for EmptyScope {
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

    fn child_package(&self, _name: &Name) -> ResolveResult<Option<Descriptor>> {
        Ok(None)
    }

    fn all_members(&self) -> ResolveResult<Arc<[Descriptor]>> {
        Ok(Arc::from(Vec::new()))
    }

    fn debug_name(&self) -> String {
        "empty scope".to_string()
    }
}

/// Append `items` to `into`, skipping instances already present
pub(crate) fn extend_unique<T>(into: &mut Vec<Arc<T>>, items: impl IntoIterator<Item = Arc<T>>) {
    let mut seen: HashSet<*const T> = into.iter().map(Arc::as_ptr).collect();
    for item in items {
        if seen.insert(Arc::as_ptr(&item)) {
            into.push(item);
        }
    }
}
