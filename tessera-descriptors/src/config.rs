//! Module configuration
//!
//! A module is configured once by the driver, before resolution starts. The
//! configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! default_imports = ["lang.*", "collections.*"]
//!
//! [platform_classes]
//! "java.lang.String" = "lang.String"
//! ```

use crate::descriptors::TypeRef;
use crate::error::ConfigError;
use crate::name::{FqName, ImportPath};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::Deserialize;

lazy_static! {
    /// Platform classes and primitives with a language counterpart
    static ref BUILTIN_PLATFORM_CLASSES: PlatformClassMap = PlatformClassMap::from_pairs([
        ("java.lang.Object", "lang.Any"),
        ("java.lang.String", "lang.String"),
        ("java.lang.CharSequence", "lang.CharSequence"),
        ("java.lang.Throwable", "lang.Throwable"),
        ("java.lang.Comparable", "lang.Comparable"),
        ("java.lang.Enum", "lang.Enum"),
        ("java.lang.annotation.Annotation", "lang.Annotation"),
        ("java.lang.Iterable", "collections.Iterable"),
        ("java.util.Iterator", "collections.Iterator"),
        ("java.util.Collection", "collections.Collection"),
        ("java.util.List", "collections.List"),
        ("java.util.Set", "collections.Set"),
        ("java.util.Map", "collections.Map"),
        ("java.lang.Integer", "lang.Int"),
        ("java.lang.Long", "lang.Long"),
        ("java.lang.Short", "lang.Short"),
        ("java.lang.Byte", "lang.Byte"),
        ("java.lang.Character", "lang.Char"),
        ("java.lang.Boolean", "lang.Boolean"),
        ("java.lang.Float", "lang.Float"),
        ("java.lang.Double", "lang.Double"),
        ("int", "lang.Int"),
        ("long", "lang.Long"),
        ("short", "lang.Short"),
        ("byte", "lang.Byte"),
        ("char", "lang.Char"),
        ("boolean", "lang.Boolean"),
        ("float", "lang.Float"),
        ("double", "lang.Double"),
        ("void", "lang.Unit"),
    ]);

    static ref DEFAULT_IMPORTS: Vec<ImportPath> = vec![
        ImportPath::from("lang.*"),
        ImportPath::from("collections.*"),
    ];
}

/// Mapping from platform class names to the language classes they stand for
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PlatformClassMap {
    mappings: IndexMap<FqName, FqName>,
}

impl PlatformClassMap {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            mappings: pairs
                .into_iter()
                .map(|(platform, language)| (FqName::new(platform), FqName::new(language)))
                .collect(),
        }
    }

    /// The table used when a module is not configured otherwise
    pub fn builtin() -> &'static PlatformClassMap {
        &BUILTIN_PLATFORM_CLASSES
    }

    pub fn language_class(&self, platform: &FqName) -> Option<&FqName> {
        self.mappings.get(platform)
    }

    /// Platform classes mapped onto `language`
    pub fn platform_classes<'a>(&'a self, language: &'a FqName) -> impl Iterator<Item = &'a FqName> {
        self.mappings
            .iter()
            .filter(move |(_, mapped)| *mapped == language)
            .map(|(platform, _)| platform)
    }

    /// Translate a platform type reference, leaving unmapped types untouched
    pub fn map_type(&self, type_ref: &TypeRef) -> TypeRef {
        match self.language_class(&FqName::new(type_ref.as_str())) {
            Some(language) => TypeRef::new(language.as_dotted()),
            None => type_ref.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

fn builtin_platform_classes() -> PlatformClassMap {
    BUILTIN_PLATFORM_CLASSES.clone()
}

fn default_imports() -> Vec<ImportPath> {
    DEFAULT_IMPORTS.clone()
}

/// Module-level settings fixed before resolution starts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleConfiguration {
    /// Imports implicitly present in every file of the module
    #[serde(default = "default_imports")]
    pub default_imports: Vec<ImportPath>,

    #[serde(default = "builtin_platform_classes")]
    pub platform_classes: PlatformClassMap,
}

impl ModuleConfiguration {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::from_toml("module configuration", e))
    }

    pub fn with_default_imports(mut self, imports: Vec<ImportPath>) -> Self {
        self.default_imports = imports;
        self
    }

    pub fn with_platform_classes(mut self, platform_classes: PlatformClassMap) -> Self {
        self.platform_classes = platform_classes;
        self
    }
}

impl Default for ModuleConfiguration {
    fn default() -> Self {
        Self {
            default_imports: default_imports(),
            platform_classes: builtin_platform_classes(),
        }
    }
}
