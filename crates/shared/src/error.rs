//! Application-wide error taxonomy and storage errors.
//!
//! Every domain error in the engine maps onto one [`ErrorKind`], so callers
//! embedding the engine (HTTP layer, CLI, batch jobs) can translate failures
//! uniformly without matching on each service's error enum.

use thiserror::Error;

/// Classification of engine failures.
///
/// Domain error enums expose a `kind()` accessor returning one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input (non-positive amount, empty reason, bad percentage).
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// The operation is not allowed in the record's current state.
    BusinessRule,
    /// Two writers raced, or a uniqueness rule was violated.
    Conflict,
    /// The backing store failed; the operation may be retried.
    Store,
}

impl ErrorKind {
    /// Returns the stable machine-readable code for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::BusinessRule => "BUSINESS_RULE_VIOLATION",
            Self::Conflict => "CONFLICT",
            Self::Store => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code an embedding API layer should use.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::BusinessRule => 422,
            Self::Conflict => 409,
            Self::Store => 500,
        }
    }

    /// Whether retrying the same call can succeed without operator action.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Conflict | Self::Store)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a storage backend.
///
/// These carry no domain meaning on their own; services wrap them and decide
/// how each surfaces (e.g. a version conflict becomes a retryable
/// concurrent-modification error).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic concurrency check failed: the record's version column
    /// moved between read and write.
    #[error("version conflict: expected version {expected}, found {actual}")]
    VersionConflict {
        /// The version the caller read.
        expected: i64,
        /// The version currently stored.
        actual: i64,
    },

    /// The record disappeared between read and write.
    #[error("record no longer exists")]
    RecordVanished,

    /// A stored record could not be decoded back into a domain value.
    #[error("corrupt record: {0}")]
    InvalidRecord(String),

    /// The backing store is unreachable or failed mid-operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Maps this storage failure onto the engine's error taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::VersionConflict { .. } => ErrorKind::Conflict,
            Self::RecordVanished => ErrorKind::NotFound,
            Self::InvalidRecord(_) | Self::Unavailable(_) => ErrorKind::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_status_codes() {
        assert_eq!(ErrorKind::Validation.status_code(), 400);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::BusinessRule.status_code(), 422);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::Store.status_code(), 500);
    }

    #[test]
    fn test_kind_codes_are_stable() {
        assert_eq!(ErrorKind::Validation.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorKind::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorKind::BusinessRule.as_str(), "BUSINESS_RULE_VIOLATION");
        assert_eq!(ErrorKind::Conflict.as_str(), "CONFLICT");
        assert_eq!(ErrorKind::Store.as_str(), "STORE_ERROR");
    }

    #[test]
    fn test_retryability() {
        assert!(ErrorKind::Conflict.is_retryable());
        assert!(ErrorKind::Store.is_retryable());
        assert!(!ErrorKind::Validation.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(!ErrorKind::BusinessRule.is_retryable());
    }

    #[test]
    fn test_store_error_kinds() {
        let conflict = StoreError::VersionConflict {
            expected: 1,
            actual: 2,
        };
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert_eq!(StoreError::RecordVanished.kind(), ErrorKind::NotFound);
        assert_eq!(
            StoreError::InvalidRecord("bad status".into()).kind(),
            ErrorKind::Store
        );
        assert_eq!(
            StoreError::Unavailable("timeout".into()).kind(),
            ErrorKind::Store
        );
    }

    #[test]
    fn test_version_conflict_display() {
        let err = StoreError::VersionConflict {
            expected: 3,
            actual: 5,
        };
        assert_eq!(
            err.to_string(),
            "version conflict: expected version 3, found 5"
        );
    }
}
