//! Resolution of raw binary members into descriptors

use super::{BinaryClass, BinaryField, BinaryMethod};
use crate::config::PlatformClassMap;
use crate::descriptors::{
    DeclarationRef, FunctionDescriptor, Origin, PropertyDescriptor, ValueParameter,
};
use crate::error::ResolveResult;
use crate::name::Name;
use std::sync::Arc;
use tracing::trace;

/// Turns one raw binary member into its descriptor
///
/// `None` means the member has no counterpart in the language (a synthetic
/// bridge, for instance). Member inventories never list such members, so a
/// `None` for a listed member is an internal inconsistency.
pub trait MemberResolver: Send + Sync {
    fn resolve_method(
        &self,
        container: &DeclarationRef,
        owner: &BinaryClass,
        method: &BinaryMethod,
    ) -> ResolveResult<Option<Arc<FunctionDescriptor>>>;

    fn resolve_field(
        &self,
        container: &DeclarationRef,
        owner: &BinaryClass,
        field: &BinaryField,
    ) -> ResolveResult<Option<Arc<PropertyDescriptor>>>;
}

/// Maps platform types to language types through a [`PlatformClassMap`]
///
/// Parameters are named positionally (`p0`, `p1`, ...) because class files
/// do not reliably carry parameter names.
#[derive(Debug, Clone)]
pub struct PlatformMemberResolver {
    platform_classes: PlatformClassMap,
}

impl PlatformMemberResolver {
    pub fn new(platform_classes: PlatformClassMap) -> Self {
        Self { platform_classes }
    }
}

impl MemberResolver for PlatformMemberResolver {
    fn resolve_method(
        &self,
        container: &DeclarationRef,
        owner: &BinaryClass,
        method: &BinaryMethod,
    ) -> ResolveResult<Option<Arc<FunctionDescriptor>>> {
        if method.is_synthetic || method.is_initializer() {
            return Ok(None);
        }
        trace!(class = %owner.fq_name, method = %method.name, "resolving binary method");

        let parameters = method
            .parameters
            .iter()
            .enumerate()
            .map(|(index, type_ref)| ValueParameter {
                name: Name::identifier(format!("p{index}")),
                type_ref: self.platform_classes.map_type(type_ref),
            })
            .collect();

        Ok(Some(FunctionDescriptor::new(
            method.name.clone(),
            container.clone(),
            parameters,
            self.platform_classes.map_type(&method.return_type),
            method.is_static,
            Origin::Binary,
        )))
    }

    fn resolve_field(
        &self,
        container: &DeclarationRef,
        owner: &BinaryClass,
        field: &BinaryField,
    ) -> ResolveResult<Option<Arc<PropertyDescriptor>>> {
        trace!(class = %owner.fq_name, field = %field.name, "resolving binary field");
        Ok(Some(PropertyDescriptor::new(
            field.name.clone(),
            container.clone(),
            self.platform_classes.map_type(&field.type_ref),
            !field.is_final,
            field.is_static,
            Origin::Binary,
        )))
    }
}
