//! Diagnostics raised while resolving declarations
//!
//! Resolution never aborts because a classpath entry is unreadable. An
//! unreadable package degrades to an empty fragment, an unreadable class is
//! left out of its package, and a module-scoped diagnostic (no source
//! location) is handed to a [`DiagnosticReporter`].

use crate::name::{FqName, Name};
use miette::Diagnostic;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// A problem found during resolution that does not stop it
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionDiagnostic {
    #[error("Cannot read binary package {package} in module {module}: {reason}")]
    #[diagnostic(
        code(tessera::binary::unreadable_package),
        severity(Warning),
        help("Declarations from this package are unavailable; check the classpath entry")
    )]
    UnreadablePackage {
        module: Name,
        package: FqName,
        reason: String,
    },

    #[error("Cannot read binary class {class} in module {module}: {reason}")]
    #[diagnostic(
        code(tessera::binary::unreadable_class),
        severity(Warning),
        help("The class and its members are unavailable; the rest of its package still resolves")
    )]
    UnreadableClass {
        module: Name,
        class: FqName,
        reason: String,
    },
}

impl ResolutionDiagnostic {
    /// The module the diagnostic is attached to
    pub fn module(&self) -> &Name {
        match self {
            ResolutionDiagnostic::UnreadablePackage { module, .. }
            | ResolutionDiagnostic::UnreadableClass { module, .. } => module,
        }
    }
}

/// Receiver of resolution diagnostics
pub trait DiagnosticReporter: Send + Sync {
    fn report(&self, diagnostic: ResolutionDiagnostic);
}

/// Keeps every reported diagnostic
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Mutex<Vec<ResolutionDiagnostic>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<ResolutionDiagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticReporter for CollectingReporter {
    fn report(&self, diagnostic: ResolutionDiagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

/// Discards every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl DiagnosticReporter for NullReporter {
    fn report(&self, _diagnostic: ResolutionDiagnostic) {}
}
