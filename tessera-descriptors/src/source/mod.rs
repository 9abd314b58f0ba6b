//! Source-declared packages
//!
//! The parser hands over declaration trees grouped by file. This module keeps
//! them per package and exposes them through [`SourceDeclarationProvider`],
//! which the source fragment provider turns into lazily resolved fragments.

mod members;
mod provider;

pub use members::SourceMembers;
pub use provider::SourcePackageFragmentProvider;

use crate::descriptors::{ClassKind, TypeRef};
use crate::error::ConfigError;
use crate::name::{FqName, Name};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::sync::Arc;

/// Declarations directly inside a package or a class body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MemberDeclarations {
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
    #[serde(default)]
    pub functions: Vec<FunctionDeclaration>,
    #[serde(default)]
    pub properties: Vec<PropertyDeclaration>,
}

impl MemberDeclarations {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty() && self.properties.is_empty()
    }

    fn merge(&mut self, other: MemberDeclarations) {
        self.classes.extend(other.classes);
        self.functions.extend(other.functions);
        self.properties.extend(other.properties);
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassDeclaration {
    pub name: Name,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(flatten)]
    pub members: MemberDeclarations,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionDeclaration {
    pub name: Name,
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
    #[serde(default = "unit_type")]
    pub return_type: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParameterDeclaration {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyDeclaration {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub mutable: bool,
}

/// One parsed source file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceFile {
    #[serde(default = "FqName::root")]
    pub package: FqName,
    #[serde(flatten)]
    pub declarations: MemberDeclarations,
}

fn unit_type() -> TypeRef {
    TypeRef::new("Unit")
}

/// Source declarations, by package
pub trait SourceDeclarationProvider: Send + Sync {
    /// Declarations directly inside `package`, or `None` if no file declares it
    fn package_declarations(&self, package: &FqName) -> Option<Arc<MemberDeclarations>>;

    /// Packages directly nested under `package` that contain source files
    /// somewhere below them
    fn sub_packages(&self, package: &FqName) -> Vec<FqName>;
}

#[derive(Deserialize)]
struct SourceManifest {
    #[serde(default)]
    files: Vec<SourceFile>,
}

/// Declarations held in memory, merged across files of the same package
#[derive(Debug, Default)]
pub struct InMemorySourceDeclarations {
    packages: IndexMap<FqName, Arc<MemberDeclarations>>,
    children: IndexMap<FqName, IndexSet<FqName>>,
}

impl InMemorySourceDeclarations {
    pub fn new(files: impl IntoIterator<Item = SourceFile>) -> Self {
        let mut merged: IndexMap<FqName, MemberDeclarations> = IndexMap::new();
        let mut children: IndexMap<FqName, IndexSet<FqName>> = IndexMap::new();

        for file in files {
            let mut package = file.package.clone();
            while let Some(parent) = package.parent() {
                children.entry(parent.clone()).or_default().insert(package);
                package = parent;
            }
            merged
                .entry(file.package)
                .or_default()
                .merge(file.declarations);
        }

        Self {
            packages: merged
                .into_iter()
                .map(|(package, declarations)| (package, Arc::new(declarations)))
                .collect(),
            children,
        }
    }

    /// Load a set of files from TOML, as `[[files]]` tables
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let manifest: SourceManifest =
            toml::from_str(text).map_err(|e| ConfigError::from_toml("source declarations", e))?;
        Ok(Self::new(manifest.files))
    }

    pub fn packages(&self) -> impl Iterator<Item = &FqName> {
        self.packages.keys()
    }
}

impl SourceDeclarationProvider for InMemorySourceDeclarations {
    fn package_declarations(&self, package: &FqName) -> Option<Arc<MemberDeclarations>> {
        self.packages.get(package).cloned()
    }

    fn sub_packages(&self, package: &FqName) -> Vec<FqName> {
        self.children
            .get(package)
            .map(|children| children.iter().cloned().collect())
            .unwrap_or_default()
    }
}
