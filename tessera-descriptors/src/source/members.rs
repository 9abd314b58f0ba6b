//! Member inventory over source declarations

use super::{ClassDeclaration, MemberDeclarations};
use crate::descriptors::{
    ClassDescriptor, DeclarationRef, FunctionDescriptor, Origin, PropertyDescriptor,
    ValueParameter,
};
use crate::error::ResolveResult;
use crate::name::{FqName, Name};
use crate::scopes::{LazyMemberScope, MemberScope, ScopeMembers};
use indexmap::IndexSet;
use std::sync::Arc;
use tessera_storage::StorageManager;

/// Declarations of one package or class body, resolved on demand
///
/// Nested classes are classifiers of the enclosing class's scope. When two
/// files declare a class with the same name in one package, the first one
/// declared wins.
pub struct SourceMembers {
    storage: StorageManager,
    owner: FqName,
    declarations: Arc<MemberDeclarations>,
}

impl SourceMembers {
    pub fn new(
        storage: StorageManager,
        owner: FqName,
        declarations: Arc<MemberDeclarations>,
    ) -> Self {
        Self {
            storage,
            owner,
            declarations,
        }
    }

    /// A scope over `declarations`, owned by `container`
    pub fn scope(
        storage: &StorageManager,
        container: DeclarationRef,
        owner: FqName,
        declarations: Arc<MemberDeclarations>,
    ) -> Arc<dyn MemberScope> {
        Arc::new(LazyMemberScope::new(
            storage,
            container,
            SourceMembers::new(storage.clone(), owner, declarations),
        ))
    }

    fn create_class(
        &self,
        container: &DeclarationRef,
        declaration: &ClassDeclaration,
    ) -> Arc<ClassDescriptor> {
        let fq_name = self.owner.child(&declaration.name);
        let body = Arc::new(declaration.members.clone());
        ClassDescriptor::new(
            fq_name.clone(),
            declaration.kind,
            Origin::Source,
            container.clone(),
            |this| SourceMembers::scope(&self.storage, this, fq_name, body),
        )
    }
}

fn unique_names<'a>(names: impl Iterator<Item = &'a Name>) -> Vec<Name> {
    names.cloned().collect::<IndexSet<_>>().into_iter().collect()
}

impl ScopeMembers for SourceMembers {
    fn describe(&self) -> String {
        format!("source members of {}", self.owner)
    }

    fn class_names(&self) -> ResolveResult<Vec<Name>> {
        Ok(unique_names(self.declarations.classes.iter().map(|c| &c.name)))
    }

    fn function_names(&self) -> ResolveResult<Vec<Name>> {
        Ok(unique_names(self.declarations.functions.iter().map(|f| &f.name)))
    }

    fn property_names(&self) -> ResolveResult<Vec<Name>> {
        Ok(unique_names(self.declarations.properties.iter().map(|p| &p.name)))
    }

    fn resolve_class(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        Ok(self
            .declarations
            .classes
            .iter()
            .find(|class| &class.name == name)
            .map(|class| self.create_class(container, class)))
    }

    fn resolve_functions(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<FunctionDescriptor>>> {
        Ok(self
            .declarations
            .functions
            .iter()
            .filter(|function| &function.name == name)
            .map(|function| {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|parameter| ValueParameter {
                        name: parameter.name.clone(),
                        type_ref: parameter.type_ref.clone(),
                    })
                    .collect();
                FunctionDescriptor::new(
                    function.name.clone(),
                    container.clone(),
                    parameters,
                    function.return_type.clone(),
                    false,
                    Origin::Source,
                )
            })
            .collect())
    }

    fn resolve_properties(
        &self,
        container: &DeclarationRef,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<PropertyDescriptor>>> {
        Ok(self
            .declarations
            .properties
            .iter()
            .filter(|property| &property.name == name)
            .map(|property| {
                PropertyDescriptor::new(
                    property.name.clone(),
                    container.clone(),
                    property.type_ref.clone(),
                    property.mutable,
                    false,
                    Origin::Source,
                )
            })
            .collect())
    }
}
