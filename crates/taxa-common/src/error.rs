//! Error taxonomy for the taxa engine.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Kind classification for grouping in the diagnostic tree
//! - Enough identity per variant (raw key, category, property) to locate
//!   the offending declaration without re-running the engine
//!
//! Classification, navigation, post-init, and validation failures are always
//! recovered locally into the diagnostic tree so a build runs to completion;
//! only query-time lookups on the finished pool ([`Error::NotFound`],
//! [`Error::AmbiguousMatch`]) propagate directly to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::{CategoryName, NavPath, RawKey};

/// Result type alias for taxa operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds, used as grouping keys in the diagnostic tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A descriptor matched two or more same-priority definitions.
    AmbiguousClassification,
    /// A definition's entry factory failed.
    FactoryFailure,
    /// A navigation slot re-entered its own resolution.
    NavigationCycle,
    /// A required navigation resolved to no value.
    NavigationNullViolation,
    /// A validation hook recorded a constraint violation.
    ValidationFailure,
    /// Query-time lookup found no entry.
    NotFound,
    /// Query-time predicate matched more than one entry.
    AmbiguousMatch,
    /// A definition was registered after classification started.
    RegistryFrozen,
    /// Two definitions were registered under the same name.
    DuplicateCategory,
    /// Two entries were produced for the same raw key.
    DuplicateKey,
}

impl ErrorKind {
    /// Grouping key name (snake_case, matches the serde form).
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::AmbiguousClassification => "ambiguous_classification",
            ErrorKind::FactoryFailure => "factory_failure",
            ErrorKind::NavigationCycle => "navigation_cycle",
            ErrorKind::NavigationNullViolation => "navigation_null_violation",
            ErrorKind::ValidationFailure => "validation_failure",
            ErrorKind::NotFound => "not_found",
            ErrorKind::AmbiguousMatch => "ambiguous_match",
            ErrorKind::RegistryFrozen => "registry_frozen",
            ErrorKind::DuplicateCategory => "duplicate_category",
            ErrorKind::DuplicateKey => "duplicate_key",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Unified error type for the taxa engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Classification errors (10-19)
    #[error("raw '{raw}' matched {} definitions at priority {priority}: {}", candidates.len(), join(candidates))]
    AmbiguousClassification {
        raw: RawKey,
        priority: i32,
        candidates: Vec<CategoryName>,
    },

    #[error("factory for category '{category}' failed on raw '{raw}': {message}")]
    FactoryFailure {
        raw: RawKey,
        category: CategoryName,
        message: String,
    },

    // Navigation errors (20-29)
    #[error("navigation '{path}' re-entered its own resolution (cycle)")]
    NavigationCycle { path: NavPath },

    #[error("required navigation '{path}' resolved to no value")]
    NavigationNullViolation { path: NavPath },

    // Validation errors (30-39)
    #[error("validation failed for '{raw}': {message}")]
    ValidationFailure { raw: RawKey, message: String },

    // Query errors (40-49)
    #[error("no entry of category '{category}' for {query}")]
    NotFound { category: String, query: String },

    #[error("{matched} entries of category '{category}' satisfy the predicate, expected one")]
    AmbiguousMatch { category: String, matched: usize },

    // Registry errors (50-59)
    #[error("cannot register category '{category}': registry is frozen")]
    RegistryFrozen { category: CategoryName },

    #[error("category '{category}' is already registered")]
    DuplicateCategory { category: CategoryName },

    // Pool construction errors (60-69)
    #[error("more than one entry produced for raw '{raw}'")]
    DuplicateKey { raw: RawKey },
}

fn join(names: &[CategoryName]) -> String {
    names
        .iter()
        .map(CategoryName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// The kind used to group this error in the diagnostic tree.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AmbiguousClassification { .. } => ErrorKind::AmbiguousClassification,
            Error::FactoryFailure { .. } => ErrorKind::FactoryFailure,
            Error::NavigationCycle { .. } => ErrorKind::NavigationCycle,
            Error::NavigationNullViolation { .. } => ErrorKind::NavigationNullViolation,
            Error::ValidationFailure { .. } => ErrorKind::ValidationFailure,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::AmbiguousMatch { .. } => ErrorKind::AmbiguousMatch,
            Error::RegistryFrozen { .. } => ErrorKind::RegistryFrozen,
            Error::DuplicateCategory { .. } => ErrorKind::DuplicateCategory,
            Error::DuplicateKey { .. } => ErrorKind::DuplicateKey,
        }
    }

    /// Returns the stable error code.
    ///
    /// Codes are grouped by concern:
    /// - 10-19: Classification errors
    /// - 20-29: Navigation errors
    /// - 30-39: Validation errors
    /// - 40-49: Query errors
    /// - 50-59: Registry errors
    /// - 60-69: Pool construction errors
    pub fn code(&self) -> u32 {
        match self {
            Error::AmbiguousClassification { .. } => 10,
            Error::FactoryFailure { .. } => 11,
            Error::NavigationCycle { .. } => 20,
            Error::NavigationNullViolation { .. } => 21,
            Error::ValidationFailure { .. } => 30,
            Error::NotFound { .. } => 40,
            Error::AmbiguousMatch { .. } => 41,
            Error::RegistryFrozen { .. } => 50,
            Error::DuplicateCategory { .. } => 51,
            Error::DuplicateKey { .. } => 60,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::AmbiguousClassification { .. } => "Ambiguous Classification",
            Error::FactoryFailure { .. } => "Entry Factory Failed",
            Error::NavigationCycle { .. } => "Navigation Cycle",
            Error::NavigationNullViolation { .. } => "Required Navigation Empty",
            Error::ValidationFailure { .. } => "Validation Failed",
            Error::NotFound { .. } => "Entry Not Found",
            Error::AmbiguousMatch { .. } => "Ambiguous Match",
            Error::RegistryFrozen { .. } => "Registry Frozen",
            Error::DuplicateCategory { .. } => "Duplicate Category",
            Error::DuplicateKey { .. } => "Duplicate Raw Key",
        }
    }
}

impl From<&Error> for taxa_report::Leaf {
    fn from(err: &Error) -> Self {
        taxa_report::Leaf::new(err.kind().name(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_grouping() {
        let err = Error::AmbiguousClassification {
            raw: "r".into(),
            priority: 1,
            candidates: vec!["Even".into(), "Small".into()],
        };
        assert_eq!(err.code(), 10);
        assert_eq!(
            Error::NavigationCycle {
                path: NavPath::new("r", "p"),
            }
            .code(),
            20
        );
        assert_eq!(
            Error::NotFound {
                category: "C".into(),
                query: "raw 'r'".into(),
            }
            .code(),
            40
        );
    }

    #[test]
    fn ambiguity_message_names_all_candidates() {
        let err = Error::AmbiguousClassification {
            raw: "t4".into(),
            priority: 1,
            candidates: vec!["Even".into(), "Small".into()],
        };
        let message = err.to_string();
        assert!(message.contains("t4"));
        assert!(message.contains("Even, Small"));
        assert!(message.contains("priority 1"));
    }

    #[test]
    fn leaf_conversion_uses_kind_name() {
        let err = Error::NavigationNullViolation {
            path: NavPath::new("a", "partner"),
        };
        let leaf = taxa_report::Leaf::from(&err);
        assert_eq!(leaf.kind, "navigation_null_violation");
        assert!(leaf.message.contains("a.partner"));
    }

    #[test]
    fn kind_name_matches_serde_form() {
        let json = serde_json::to_string(&ErrorKind::AmbiguousClassification).unwrap();
        assert_eq!(json, "\"ambiguous_classification\"");
        assert_eq!(
            ErrorKind::AmbiguousClassification.name(),
            "ambiguous_classification"
        );
    }
}
