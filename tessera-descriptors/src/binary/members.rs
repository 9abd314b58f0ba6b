//! Member inventories over binary packages and classes
//!
//! A binary class is seen through two scopes. The instance scope lists its
//! non-static members and its nested classes as classifiers. The static scope
//! lists its static members and exposes each nested class only as a nested
//! namespace (the nested class's own static namespace), never as a classifier.

use super::context::BinaryContext;
use super::{BinaryClass, BinaryMethod};
use crate::descriptors::{
    ClassDescriptor, DeclarationRef, Descriptor, FunctionDescriptor, PropertyDescriptor,
};
use crate::error::{ResolveError, ResolveResult};
use crate::name::{FqName, Name};
use crate::scopes::{LazyMemberScope, MemberScope, ScopeMembers};
use indexmap::IndexSet;
use std::sync::{Arc, Weak};
use tessera_storage::StorageManager;

fn unique_names<'a>(names: impl Iterator<Item = &'a Name>) -> Vec<Name> {
    names.cloned().collect::<IndexSet<_>>().into_iter().collect()
}

fn is_visible_method(method: &BinaryMethod, statics: bool) -> bool {
    method.is_static == statics && !method.is_synthetic && !method.is_initializer()
}

fn unresolvable(class: &BinaryClass, name: &Name) -> ResolveError {
    ResolveError::InternalInconsistency {
        name: name.clone(),
        container: format!("binary class {}", class.fq_name),
    }
}

/// Every visible overload of `name`; each must resolve
fn resolve_methods(
    context: &BinaryContext,
    container: &DeclarationRef,
    class: &BinaryClass,
    name: &Name,
    statics: bool,
) -> ResolveResult<Vec<Arc<FunctionDescriptor>>> {
    class
        .methods
        .iter()
        .filter(|method| &method.name == name && is_visible_method(method, statics))
        .map(|method| {
            context
                .resolver()
                .resolve_method(container, class, method)?
                .ok_or_else(|| unresolvable(class, name))
        })
        .collect()
}

fn resolve_fields(
    context: &BinaryContext,
    container: &DeclarationRef,
    class: &BinaryClass,
    name: &Name,
    statics: bool,
) -> ResolveResult<Vec<Arc<PropertyDescriptor>>> {
    class
        .fields
        .iter()
        .filter(|field| &field.name == name && field.is_static == statics)
        .map(|field| {
            context
                .resolver()
                .resolve_field(container, class, field)?
                .ok_or_else(|| unresolvable(class, name))
        })
        .collect()
}

/// Names of the classes under `owner` whose class data can be read
fn readable_classes(
    context: &BinaryContext,
    owner: &FqName,
    names: impl IntoIterator<Item = Name>,
) -> ResolveResult<Vec<Name>> {
    let mut readable = Vec::new();
    for name in names {
        if context.class_data(&owner.child(&name))?.is_some() {
            readable.push(name);
        }
    }
    Ok(readable)
}

/// Members of a binary package
///
/// Top-level classes are the package's classes, minus its facade and minus
/// classes that cannot be read. Functions and properties are the static
/// members of the facade.
pub struct BinaryPackageMembers {
    context: Weak<BinaryContext>,
    fq_name: FqName,
}

impl BinaryPackageMembers {
    pub(crate) fn scope(
        storage: &StorageManager,
        container: DeclarationRef,
        context: Weak<BinaryContext>,
        fq_name: FqName,
    ) -> Arc<dyn MemberScope> {
        Arc::new(LazyMemberScope::new(
            storage,
            container,
            BinaryPackageMembers { context, fq_name },
        ))
    }

    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    fn context(&self) -> ResolveResult<Arc<BinaryContext>> {
        BinaryContext::upgrade(&self.context, &self.fq_name)
    }

    /// Top-level class names other than the facade
    fn listed_classes(&self, context: &BinaryContext) -> ResolveResult<Vec<Name>> {
        Ok(match context.package(&self.fq_name)? {
            Some(package) => package
                .class_names
                .iter()
                .filter(|name| package.facade.as_ref() != Some(*name))
                .cloned()
                .collect(),
            None => Vec::new(),
        })
    }

    fn facade(&self, context: &BinaryContext) -> ResolveResult<Option<Arc<BinaryClass>>> {
        let Some(package) = context.package(&self.fq_name)? else {
            return Ok(None);
        };
        match &package.facade {
            Some(facade) => context.class_data(&self.fq_name.child(facade)),
            None => Ok(None),
        }
    }
}

impl ScopeMembers for BinaryPackageMembers {
    fn describe(&self) -> String {
        format!("binary package {}", self.fq_name)
    }

    fn class_names(&self) -> ResolveResult<Vec<Name>> {
        let context = self.context()?;
        let listed = self.listed_classes(&*context)?;
        readable_classes(&*context, &self.fq_name, listed)
    }

    fn function_names(&self) -> ResolveResult<Vec<Name>> {
        let context = self.context()?;
        Ok(match self.facade(&*context)? {
            Some(facade) => unique_names(
                facade
                    .methods
                    .iter()
                    .filter(|method| is_visible_method(method, true))
                    .map(|method| &method.name),
            ),
            None => Vec::new(),
        })
    }

    fn property_names(&self) -> ResolveResult<Vec<Name>> {
        let context = self.context()?;
        Ok(match self.facade(&*context)? {
            Some(facade) => unique_names(
                facade
                    .fields
                    .iter()
                    .filter(|field| field.is_static)
                    .map(|field| &field.name),
            ),
            None => Vec::new(),
        })
    }

    fn resolve_class(
        &self,
        _container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        let context = self.context()?;
        if !self.listed_classes(&*context)?.contains(name) {
            return Ok(None);
        }
        context.class(&self.fq_name.child(name))
    }

    fn resolve_functions(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<FunctionDescriptor>>> {
        let context = self.context()?;
        match self.facade(&*context)? {
            Some(facade) => resolve_methods(&*context, container, &facade, name, true),
            None => Ok(Vec::new()),
        }
    }

    fn resolve_properties(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<PropertyDescriptor>>> {
        let context = self.context()?;
        match self.facade(&*context)? {
            Some(facade) => resolve_fields(&*context, container, &facade, name, true),
            None => Ok(Vec::new()),
        }
    }
}

/// Instance or static members of a binary class
pub struct BinaryClassMembers {
    context: Weak<BinaryContext>,
    class: Arc<BinaryClass>,
    statics: bool,
}

impl BinaryClassMembers {
    pub(crate) fn scope(
        storage: &StorageManager,
        container: DeclarationRef,
        context: Weak<BinaryContext>,
        class: Arc<BinaryClass>,
        statics: bool,
    ) -> Arc<dyn MemberScope> {
        Arc::new(LazyMemberScope::new(
            storage,
            container,
            BinaryClassMembers {
                context,
                class,
                statics,
            },
        ))
    }

    pub fn class(&self) -> &BinaryClass {
        &self.class
    }

    /// Whether this is the static-members view of the class
    pub fn is_static(&self) -> bool {
        self.statics
    }

    fn context(&self) -> ResolveResult<Arc<BinaryContext>> {
        BinaryContext::upgrade(&self.context, &self.class.fq_name)
    }

    fn nested_class(&self, name: &Name) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        if !self.class.has_inner_class(name) {
            return Ok(None);
        }
        self.context()?.class(&self.class.fq_name.child(name))
    }
}

impl ScopeMembers for BinaryClassMembers {
    fn describe(&self) -> String {
        let kind = if self.statics { "static" } else { "instance" };
        format!("{kind} members of binary class {}", self.class.fq_name)
    }

    fn class_names(&self) -> ResolveResult<Vec<Name>> {
        if self.statics {
            return Ok(Vec::new());
        }
        readable_classes(
            &*self.context()?,
            &self.class.fq_name,
            unique_names(self.class.inner_classes.iter()),
        )
    }

    fn function_names(&self) -> ResolveResult<Vec<Name>> {
        Ok(unique_names(
            self.class
                .methods
                .iter()
                .filter(|method| is_visible_method(method, self.statics))
                .map(|method| &method.name),
        ))
    }

    fn property_names(&self) -> ResolveResult<Vec<Name>> {
        Ok(unique_names(
            self.class
                .fields
                .iter()
                .filter(|field| field.is_static == self.statics)
                .map(|field| &field.name),
        ))
    }

    fn resolve_class(
        &self,
        _container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        if self.statics {
            return Ok(None);
        }
        self.nested_class(name)
    }

    fn resolve_functions(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<FunctionDescriptor>>> {
        resolve_methods(&*self.context()?, container, &self.class, name, self.statics)
    }

    fn resolve_properties(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<PropertyDescriptor>>> {
        resolve_fields(&*self.context()?, container, &self.class, name, self.statics)
    }

    fn child_package(
        &self,
        _container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Option<Descriptor>> {
        if !self.statics {
            return Ok(None);
        }
        Ok(self
            .nested_class(name)?
            .and_then(|nested| nested.static_namespace().cloned())
            .map(Descriptor::PackageFragment))
    }

    fn extra_members(
        &self,
        container: &DeclarationRef,
        into: &mut Vec<Descriptor>,
    ) -> ResolveResult<()> {
        if !self.statics {
            return Ok(());
        }
        for name in unique_names(self.class.inner_classes.iter()) {
            into.extend(self.child_package(container, &name)?);
        }
        Ok(())
    }
}
