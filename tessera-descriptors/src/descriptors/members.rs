//! Function and property descriptors

use super::{DeclarationRef, Descriptor, Origin, TypeRef};
use crate::name::Name;
use std::fmt;
use std::sync::Arc;

/// A named, typed parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueParameter {
    pub name: Name,
    pub type_ref: TypeRef,
}

/// A callable member; several with the same name form an overload group
pub struct FunctionDescriptor {
    name: Name,
    container: DeclarationRef,
    parameters: Vec<ValueParameter>,
    return_type: TypeRef,
    is_static: bool,
    origin: Origin,
}

impl FunctionDescriptor {
    pub fn new(
        name: Name,
        container: DeclarationRef,
        parameters: Vec<ValueParameter>,
        return_type: TypeRef,
        is_static: bool,
        origin: Origin,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            container,
            parameters,
            return_type,
            is_static,
            origin,
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn parameters(&self) -> &[ValueParameter] {
        &self.parameters
    }

    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn containing_declaration(&self) -> Option<Descriptor> {
        self.container.upgrade()
    }

    /// Name and parameter types, e.g. `f(Int, String)`
    pub fn signature(&self) -> String {
        let parameters = self
            .parameters
            .iter()
            .map(|parameter| parameter.type_ref.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, parameters)
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fun {}: {}", self.signature(), self.return_type)
    }
}

/// A property or field
pub struct PropertyDescriptor {
    name: Name,
    container: DeclarationRef,
    type_ref: TypeRef,
    is_mutable: bool,
    is_static: bool,
    origin: Origin,
}

impl PropertyDescriptor {
    pub fn new(
        name: Name,
        container: DeclarationRef,
        type_ref: TypeRef,
        is_mutable: bool,
        is_static: bool,
        origin: Origin,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            container,
            type_ref,
            is_mutable,
            is_static,
            origin,
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn is_mutable(&self) -> bool {
        self.is_mutable
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn containing_declaration(&self) -> Option<Descriptor> {
        self.container.upgrade()
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_mutable { "var" } else { "val" };
        write!(f, "{keyword} {}: {}", self.name, self.type_ref)
    }
}
