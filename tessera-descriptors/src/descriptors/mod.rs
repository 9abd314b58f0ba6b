//! The descriptor graph
//!
//! A descriptor is a semantic node for one named program entity. The graph is
//! owned top-down (module, providers, fragments, scopes, members); every
//! upward link is a [`DeclarationRef`], which never keeps its target alive.
//!
//! Consumers key maps by descriptor, so [`Descriptor`] compares and hashes by
//! identity: two handles are equal only if they point at the same instance.

mod class;
mod fragment;
mod members;

pub use class::{ClassDescriptor, ClassKind};
pub use fragment::{FragmentKind, PackageFragmentDescriptor};
pub use members::{FunctionDescriptor, PropertyDescriptor, ValueParameter};

use crate::module::ModuleDescriptor;
use crate::name::{FqName, Name};
use crate::package_view::PackageViewDescriptor;
use crate::scopes::MemberScope;
use serde::Deserialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Where a declaration comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Declared in the language's own source files
    Source,
    /// Read from a pre-compiled platform class
    Binary,
}

/// A reference to a type, by the name it was written with
///
/// Type resolution happens in later phases; descriptors only carry the text.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub struct TypeRef(Arc<str>);

impl TypeRef {
    pub fn new(text: impl AsRef<str>) -> Self {
        TypeRef(Arc::from(text.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        TypeRef::new(text)
    }
}

impl From<String> for TypeRef {
    fn from(text: String) -> Self {
        TypeRef(Arc::from(text))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.0)
    }
}

/// Any node of the descriptor graph
#[derive(Clone)]
pub enum Descriptor {
    Module(Arc<ModuleDescriptor>),
    PackageFragment(Arc<PackageFragmentDescriptor>),
    PackageView(Arc<PackageViewDescriptor>),
    Class(Arc<ClassDescriptor>),
    Function(Arc<FunctionDescriptor>),
    Property(Arc<PropertyDescriptor>),
}

impl Descriptor {
    pub fn name(&self) -> Name {
        match self {
            Descriptor::Module(module) => module.name().clone(),
            Descriptor::PackageFragment(fragment) => fragment.name(),
            Descriptor::PackageView(view) => view.name(),
            Descriptor::Class(class) => class.name().clone(),
            Descriptor::Function(function) => function.name().clone(),
            Descriptor::Property(property) => property.name().clone(),
        }
    }

    /// The containing declaration; `None` for modules and for descriptors
    /// whose container has been dropped
    pub fn containing_declaration(&self) -> Option<Descriptor> {
        match self {
            Descriptor::Module(_) => None,
            Descriptor::PackageFragment(fragment) => fragment.containing_declaration(),
            Descriptor::PackageView(view) => view.containing_declaration(),
            Descriptor::Class(class) => class.containing_declaration(),
            Descriptor::Function(function) => function.containing_declaration(),
            Descriptor::Property(property) => property.containing_declaration(),
        }
    }

    /// Fully qualified name, derived through the container chain for members
    pub fn fq_name(&self) -> FqName {
        match self {
            Descriptor::Module(_) => FqName::root(),
            Descriptor::PackageFragment(fragment) => fragment.fq_name().clone(),
            Descriptor::PackageView(view) => view.fq_name().clone(),
            Descriptor::Class(class) => class.fq_name().clone(),
            Descriptor::Function(_) | Descriptor::Property(_) => match self.containing_declaration() {
                Some(container) => container.fq_name().child(&self.name()),
                None => FqName::from_segments([self.name()]),
            },
        }
    }

    /// The scope of a namespace-like descriptor
    pub fn member_scope(&self) -> Option<Arc<dyn MemberScope>> {
        match self {
            Descriptor::PackageFragment(fragment) => Some(Arc::clone(fragment.member_scope())),
            Descriptor::PackageView(view) => Some(Arc::clone(view.member_scope())),
            Descriptor::Class(class) => Some(Arc::clone(class.member_scope())),
            Descriptor::Module(_) | Descriptor::Function(_) | Descriptor::Property(_) => None,
        }
    }

    pub fn as_class(&self) -> Option<&Arc<ClassDescriptor>> {
        match self {
            Descriptor::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Arc<FunctionDescriptor>> {
        match self {
            Descriptor::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Arc<PropertyDescriptor>> {
        match self {
            Descriptor::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_package_fragment(&self) -> Option<&Arc<PackageFragmentDescriptor>> {
        match self {
            Descriptor::PackageFragment(fragment) => Some(fragment),
            _ => None,
        }
    }

    pub fn as_package_view(&self) -> Option<&Arc<PackageViewDescriptor>> {
        match self {
            Descriptor::PackageView(view) => Some(view),
            _ => None,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Descriptor::Module(_) => "module",
            Descriptor::PackageFragment(_) => "package fragment",
            Descriptor::PackageView(_) => "package",
            Descriptor::Class(_) => "class",
            Descriptor::Function(_) => "function",
            Descriptor::Property(_) => "property",
        }
    }

    fn address(&self) -> *const () {
        match self {
            Descriptor::Module(d) => Arc::as_ptr(d).cast(),
            Descriptor::PackageFragment(d) => Arc::as_ptr(d).cast(),
            Descriptor::PackageView(d) => Arc::as_ptr(d).cast(),
            Descriptor::Class(d) => Arc::as_ptr(d).cast(),
            Descriptor::Function(d) => Arc::as_ptr(d).cast(),
            Descriptor::Property(d) => Arc::as_ptr(d).cast(),
        }
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && std::ptr::eq(self.address(), other.address())
    }
}

impl Eq for Descriptor {}

impl Hash for Descriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        self.address().hash(state);
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Module(module) => write!(f, "module {}", module.name()),
            Descriptor::Function(function) => {
                write!(f, "function {}", function.signature())
            }
            _ => write!(f, "{} {}", self.kind_name(), self.fq_name()),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A non-owning link from a descriptor to its container
#[derive(Clone)]
pub enum DeclarationRef {
    Module(Weak<ModuleDescriptor>),
    PackageFragment(Weak<PackageFragmentDescriptor>),
    PackageView(Weak<PackageViewDescriptor>),
    Class(Weak<ClassDescriptor>),
}

impl DeclarationRef {
    /// The referenced descriptor, if it is still alive
    pub fn upgrade(&self) -> Option<Descriptor> {
        match self {
            DeclarationRef::Module(weak) => weak.upgrade().map(Descriptor::Module),
            DeclarationRef::PackageFragment(weak) => {
                weak.upgrade().map(Descriptor::PackageFragment)
            }
            DeclarationRef::PackageView(weak) => weak.upgrade().map(Descriptor::PackageView),
            DeclarationRef::Class(weak) => weak.upgrade().map(Descriptor::Class),
        }
    }

    /// Whether this reference points at `descriptor`
    pub fn refers_to(&self, descriptor: &Descriptor) -> bool {
        match (self, descriptor) {
            (DeclarationRef::Module(weak), Descriptor::Module(d)) => {
                std::ptr::eq(weak.as_ptr(), Arc::as_ptr(d))
            }
            (DeclarationRef::PackageFragment(weak), Descriptor::PackageFragment(d)) => {
                std::ptr::eq(weak.as_ptr(), Arc::as_ptr(d))
            }
            (DeclarationRef::PackageView(weak), Descriptor::PackageView(d)) => {
                std::ptr::eq(weak.as_ptr(), Arc::as_ptr(d))
            }
            (DeclarationRef::Class(weak), Descriptor::Class(d)) => {
                std::ptr::eq(weak.as_ptr(), Arc::as_ptr(d))
            }
            _ => false,
        }
    }
}

impl From<&Arc<ModuleDescriptor>> for DeclarationRef {
    fn from(module: &Arc<ModuleDescriptor>) -> Self {
        DeclarationRef::Module(Arc::downgrade(module))
    }
}

impl From<&Arc<PackageFragmentDescriptor>> for DeclarationRef {
    fn from(fragment: &Arc<PackageFragmentDescriptor>) -> Self {
        DeclarationRef::PackageFragment(Arc::downgrade(fragment))
    }
}

impl From<&Arc<PackageViewDescriptor>> for DeclarationRef {
    fn from(view: &Arc<PackageViewDescriptor>) -> Self {
        DeclarationRef::PackageView(Arc::downgrade(view))
    }
}

impl From<&Arc<ClassDescriptor>> for DeclarationRef {
    fn from(class: &Arc<ClassDescriptor>) -> Self {
        DeclarationRef::Class(Arc::downgrade(class))
    }
}

impl fmt::Debug for DeclarationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(descriptor) => write!(f, "-> {descriptor:?}"),
            None => f.write_str("-> <dropped>"),
        }
    }
}
