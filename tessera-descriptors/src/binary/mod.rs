//! Pre-compiled platform classes
//!
//! The class-file reader is an external collaborator; it hands over raw
//! structural inventories ([`BinaryPackage`], [`BinaryClass`]) through a
//! [`BinaryClassFinder`]. This module turns those inventories into lazily
//! resolved fragments and scopes.

mod context;
mod members;
mod provider;
mod resolver;

pub use members::{BinaryClassMembers, BinaryPackageMembers};
pub use provider::BinaryPackageFragmentProvider;
pub use resolver::{MemberResolver, PlatformMemberResolver};

use crate::descriptors::{ClassKind, TypeRef};
use crate::error::{ConfigError, InventoryError};
use crate::name::{FqName, Name};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A package as seen on the classpath
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPackage {
    pub fq_name: FqName,
    /// Short names of the top-level classes, facade included
    pub class_names: Vec<Name>,
    pub sub_packages: Vec<FqName>,
    /// Class whose static members are the package-level functions and
    /// properties
    pub facade: Option<Name>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinaryClass {
    #[serde(rename = "name")]
    pub fq_name: FqName,
    #[serde(default)]
    pub kind: ClassKind,
    /// Short names of the directly nested classes
    #[serde(default)]
    pub inner_classes: Vec<Name>,
    #[serde(default)]
    pub methods: Vec<BinaryMethod>,
    #[serde(default)]
    pub fields: Vec<BinaryField>,
}

impl BinaryClass {
    pub fn has_inner_class(&self, name: &Name) -> bool {
        self.inner_classes.contains(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinaryMethod {
    pub name: Name,
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    #[serde(default = "void_type")]
    pub return_type: TypeRef,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Compiler-generated bridge or accessor
    #[serde(default, rename = "synthetic")]
    pub is_synthetic: bool,
}

impl BinaryMethod {
    /// Constructors and class initializers (`<init>`, `<clinit>`)
    pub fn is_initializer(&self) -> bool {
        self.name.is_special()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinaryField {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

fn void_type() -> TypeRef {
    TypeRef::new("void")
}

/// Reader of classpath inventories
///
/// Lookups are total: a missing package or class is `Ok(None)`. Errors mean
/// the entry exists but cannot be read.
pub trait BinaryClassFinder: Send + Sync {
    fn find_package(&self, fq_name: &FqName) -> Result<Option<Arc<BinaryPackage>>, InventoryError>;

    fn find_class(&self, fq_name: &FqName) -> Result<Option<Arc<BinaryClass>>, InventoryError>;
}

#[derive(Deserialize)]
struct PackageEntry {
    name: FqName,
    #[serde(default)]
    facade: Option<Name>,
}

#[derive(Deserialize)]
struct ClasspathManifest {
    #[serde(default)]
    packages: Vec<PackageEntry>,
    #[serde(default)]
    classes: Vec<BinaryClass>,
    #[serde(default)]
    unreadable: Vec<FqName>,
}

/// A classpath held in memory
///
/// Packages are derived from the classes they contain; nested classes are
/// recognised by their enclosing class listing them in `inner_classes`.
#[derive(Debug, Default)]
pub struct InMemoryClassFinder {
    packages: IndexMap<FqName, Arc<BinaryPackage>>,
    classes: IndexMap<FqName, Arc<BinaryClass>>,
    unreadable: IndexSet<FqName>,
    lookups: AtomicUsize,
}

impl InMemoryClassFinder {
    pub fn new(classes: impl IntoIterator<Item = BinaryClass>) -> Self {
        let classes: IndexMap<FqName, Arc<BinaryClass>> = classes
            .into_iter()
            .map(|class| (class.fq_name.clone(), Arc::new(class)))
            .collect();

        let mut packages: IndexMap<FqName, BinaryPackage> = IndexMap::new();
        for (fq_name, _) in classes.iter() {
            let (Some(parent), Some(short_name)) = (fq_name.parent(), fq_name.short_name()) else {
                continue;
            };
            let nested = classes
                .get(&parent)
                .is_some_and(|outer| outer.has_inner_class(short_name));
            if !nested {
                package_entry(&mut packages, &parent)
                    .class_names
                    .push(short_name.clone());
            }
        }

        let mut finder = Self {
            packages: IndexMap::new(),
            classes,
            unreadable: IndexSet::new(),
            lookups: AtomicUsize::new(0),
        };
        finder.packages = link_packages(packages);
        finder
    }

    /// Load a classpath from TOML (`[[packages]]`, `[[classes]]`, `unreadable`)
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let manifest: ClasspathManifest =
            toml::from_str(text).map_err(|e| ConfigError::from_toml("classpath", e))?;

        let mut finder = Self::new(manifest.classes);
        for entry in manifest.packages {
            finder.set_facade(&entry.name, entry.facade);
        }
        for fq_name in manifest.unreadable {
            finder.mark_unreadable(fq_name);
        }
        Ok(finder)
    }

    /// Declare the facade class of `package`, creating the package if needed
    pub fn set_facade(&mut self, package: &FqName, facade: Option<Name>) {
        let mut packages: IndexMap<FqName, BinaryPackage> = self
            .packages
            .drain(..)
            .map(|(fq_name, package)| (fq_name, Arc::unwrap_or_clone(package)))
            .collect();
        package_entry(&mut packages, package).facade = facade;
        self.packages = link_packages(packages);
    }

    /// Make every lookup of `fq_name` fail as an unreadable entry
    pub fn mark_unreadable(&mut self, fq_name: FqName) {
        self.unreadable.insert(fq_name);
    }

    /// Number of lookups served so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Serve one lookup; only entries that exist can fail to read
    fn read<T>(&self, fq_name: &FqName, entry: Option<&Arc<T>>) -> Result<Option<Arc<T>>, InventoryError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        match entry {
            Some(_) if self.unreadable.contains(fq_name) => Err(InventoryError::Unreadable {
                entry: fq_name.to_string(),
                reason: "entry is marked unreadable".to_string(),
            }),
            found => Ok(found.cloned()),
        }
    }
}

fn package_entry<'a>(
    packages: &'a mut IndexMap<FqName, BinaryPackage>,
    fq_name: &FqName,
) -> &'a mut BinaryPackage {
    packages
        .entry(fq_name.clone())
        .or_insert_with(|| BinaryPackage {
            fq_name: fq_name.clone(),
            class_names: Vec::new(),
            sub_packages: Vec::new(),
            facade: None,
        })
}

/// Create the ancestors of every package and record parent-child links
fn link_packages(
    mut packages: IndexMap<FqName, BinaryPackage>,
) -> IndexMap<FqName, Arc<BinaryPackage>> {
    let names: Vec<FqName> = packages.keys().cloned().collect();
    for name in names {
        let mut child = name;
        while let Some(parent) = child.parent() {
            let entry = package_entry(&mut packages, &parent);
            if !entry.sub_packages.contains(&child) {
                entry.sub_packages.push(child);
            }
            child = parent;
        }
    }
    packages
        .into_iter()
        .map(|(fq_name, package)| (fq_name, Arc::new(package)))
        .collect()
}

impl BinaryClassFinder for InMemoryClassFinder {
    fn find_package(&self, fq_name: &FqName) -> Result<Option<Arc<BinaryPackage>>, InventoryError> {
        self.read(fq_name, self.packages.get(fq_name))
    }

    fn find_class(&self, fq_name: &FqName) -> Result<Option<Arc<BinaryClass>>, InventoryError> {
        self.read(fq_name, self.classes.get(fq_name))
    }
}
