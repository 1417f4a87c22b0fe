#![forbid(unsafe_code)]

//! Registration errors.

use crate::category::Category;

/// Failure to register one entry. Isolated to that entry: callers keep
/// processing siblings.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("cannot resolve implementation '{implementation}' for {category} {id}: {reason}")]
    UnresolvableImplementation {
        category: Category,
        id: String,
        implementation: String,
        reason: Unresolved,
    },

    #[error("implementation '{implementation}' for {id} is a {found}, expected a {expected}")]
    CapabilityMismatch {
        id: String,
        implementation: String,
        expected: Category,
        found: Category,
    },
}

impl RegistrationError {
    /// The identifier (URI or implementation identifier) the entry was
    /// registered under.
    pub fn id(&self) -> &str {
        match self {
            Self::UnresolvableImplementation { id, .. } | Self::CapabilityMismatch { id, .. } => id,
        }
    }

    pub fn implementation(&self) -> &str {
        match self {
            Self::UnresolvableImplementation { implementation, .. }
            | Self::CapabilityMismatch { implementation, .. } => implementation,
        }
    }

    /// True when the implementation is known but a dependency it needs is
    /// not present in this build or environment.
    pub fn is_missing_dependency(&self) -> bool {
        matches!(
            self,
            Self::UnresolvableImplementation {
                reason: Unresolved::MissingDependency(_),
                ..
            }
        )
    }
}

/// Why an implementation could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum Unresolved {
    #[error("no such implementation")]
    NotFound,

    #[error("missing dependency: {0}")]
    MissingDependency(String),

    #[error("construction failed: {0}")]
    Construction(#[source] ulriksdal_core::Error),
}

/// A prefix is already bound to a different namespace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("prefix '{prefix}' is already assigned to namespace {existing}")]
pub struct PrefixConflict {
    pub prefix: String,
    pub existing: String,
    pub requested: String,
}
