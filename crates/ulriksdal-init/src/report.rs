#![forbid(unsafe_code)]

//! Outcome of one bootstrap.

use ulriksdal_core::Error;
use ulriksdal_registry::{Category, PrefixConflict, RegistrationError};

use crate::config::SkippedEntry;

/// Which procedure populated the registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitMode {
    /// From the configuration document at `path`.
    Configuration { path: String },
    /// From the compiled-in default tables.
    Defaults,
}

/// One successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub category: Category,
    /// Algorithm URI, or implementation identifier for resolvers.
    pub id: String,
    pub implementation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One entry that could not be registered.
#[derive(Debug)]
pub struct EntryFailure {
    pub category: Category,
    pub severity: Severity,
    pub error: RegistrationError,
}

impl EntryFailure {
    /// Resolver entries and entries whose implementation lacks a dependency
    /// in this build are warnings; anything else is an error.
    pub fn new(category: Category, error: RegistrationError) -> Self {
        let severity = if category.is_resolver() || error.is_missing_dependency() {
            Severity::Warning
        } else {
            Severity::Error
        };
        Self {
            category,
            severity,
            error,
        }
    }
}

/// Everything a bootstrap did, entry by entry.
#[derive(Debug)]
pub struct InitReport {
    pub mode: InitMode,
    pub registered: Vec<Registration>,
    pub failures: Vec<EntryFailure>,
    pub prefix_conflicts: Vec<PrefixConflict>,
    /// Entries lacking a required attribute.
    pub skipped: Vec<SkippedEntry>,
    /// Set when a lenient bootstrap could not fetch or parse its document.
    pub document_error: Option<Error>,
}

impl InitReport {
    pub(crate) fn new(mode: InitMode) -> Self {
        Self {
            mode,
            registered: Vec::new(),
            failures: Vec::new(),
            prefix_conflicts: Vec::new(),
            skipped: Vec::new(),
            document_error: None,
        }
    }

    /// No failures, conflicts, skipped entries or document error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
            && self.prefix_conflicts.is_empty()
            && self.skipped.is_empty()
            && self.document_error.is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &EntryFailure> {
        self.failures.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &EntryFailure> {
        self.failures.iter().filter(|f| f.severity == Severity::Warning)
    }

    /// Identifiers registered in `category`, in registration order.
    pub fn registered_in(&self, category: Category) -> impl Iterator<Item = &str> {
        self.registered
            .iter()
            .filter(move |r| r.category == category)
            .map(|r| r.id.as_str())
    }

    /// The failure recorded for `id`, if any.
    pub fn failure_for(&self, id: &str) -> Option<&EntryFailure> {
        self.failures.iter().find(|f| f.error.id() == id)
    }
}
