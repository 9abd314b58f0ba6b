//! Error types for descriptor resolution
//!
//! Absence of a symbol is never an error: lookups answer `None` or an empty
//! collection. The enums here cover the remaining outcomes: storage-level
//! interruptions, internal inconsistencies between an inventory and its
//! resolver, unreadable inventories and misuse of the module construction API.

use crate::name::{FqName, Name};
use miette::Diagnostic;
use tessera_storage::StorageError;
use thiserror::Error;

/// Result alias used by every lookup operation
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Failure of a lookup in the descriptor graph
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal inconsistency: {container} lists `{name}` but it cannot be resolved")]
    #[diagnostic(
        code(tessera::resolve::internal_inconsistency),
        help("The declaration inventory and the member resolver disagree. This is a bug in the stage that produced the inventory, not in user code.")
    )]
    InternalInconsistency { name: Name, container: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Inventory(#[from] InventoryError),

    #[error("{what} was used after its module was dropped")]
    #[diagnostic(
        code(tessera::resolve::disposed),
        help("Descriptors only resolve members while the module that produced them is alive")
    )]
    Disposed { what: String },
}

impl ResolveError {
    /// Whether the failure was caused by session cancellation
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ResolveError::Storage(error) if error.is_cancellation())
    }
}

/// Failure to read a declaration inventory
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Cannot read `{entry}`: {reason}")]
    #[diagnostic(
        code(tessera::inventory::unreadable),
        help("Check that the classpath entry exists and is readable")
    )]
    Unreadable { entry: String, reason: String },

    #[error("Corrupt class data in `{entry}`: {reason}")]
    #[diagnostic(
        code(tessera::inventory::corrupt),
        help("The entry was produced by an incompatible or broken compiler; rebuild it")
    )]
    Corrupt { entry: String, reason: String },
}

/// Misuse of the module construction API
///
/// These indicate a bug in the driver and are never caused by user input.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("Module name must be special (like `<main>`), got `{name}`")]
    #[diagnostic(
        code(tessera::module::invalid_name),
        help("Use `Name::special(\"<main>\")` for module names")
    )]
    InvalidModuleName { name: Name },

    #[error("Configuration of module {module} is already set")]
    #[diagnostic(
        code(tessera::module::configuration_already_set),
        help("A module is configured exactly once, before resolution starts")
    )]
    ConfigurationAlreadySet { module: Name },

    #[error("Root package of module {module} is already set")]
    #[diagnostic(code(tessera::module::root_package_already_set))]
    RootPackageAlreadySet { module: Name },

    #[error("Package fragment {fragment} does not belong to module {module}")]
    #[diagnostic(
        code(tessera::module::foreign_root_package),
        help("The root package fragment must be created with this module as its container")
    )]
    ForeignRootPackage { module: Name, fragment: FqName },

    #[error("Cannot add a fragment provider to module {module} after packages were queried")]
    #[diagnostic(
        code(tessera::module::providers_sealed),
        help("Register every fragment provider before the first package lookup")
    )]
    ProvidersSealed { module: Name },
}

/// Malformed configuration or fixture text
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {what}: {reason}")]
    #[diagnostic(code(tessera::config::invalid))]
    Invalid { what: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn from_toml(what: &'static str, error: toml::de::Error) -> Self {
        ConfigError::Invalid {
            what,
            reason: error.message().to_string(),
        }
    }
}
