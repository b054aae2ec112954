//! Unified error type for reelbase.
//!
//! Every crate in the workspace funnels its failures into [`Error`]. None of
//! the variants are retried; each one is terminal for the current operation
//! and propagates to the top-level caller.

use std::fmt;

/// Unified error type covering all failure modes in reelbase.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "media", "tmdb id").
        entity: String,
        /// The identifier or search term that was looked up.
        id: String,
    },

    /// A value failed validation at the point of assignment.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A namespace name or code outside the known set was supplied.
    #[error("External site namespace unrecognized: {0}")]
    UnrecognizedNamespace(String),

    /// The HTTP transport failed or the provider answered with an error status.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a body that could not be interpreted.
    #[error("API error: {0}")]
    Api(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Whether this error means "nothing there" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::not_found("media", "tt0133093");
        assert_eq!(err.to_string(), "media not found: tt0133093");
        assert!(err.is_not_found());
    }

    #[test]
    fn validation_display() {
        let err = Error::validation("TMDB IDs must be integers");
        assert_eq!(err.to_string(), "Validation error: TMDB IDs must be integers");
        assert!(!err.is_not_found());
    }

    #[test]
    fn unrecognized_namespace_display() {
        let err = Error::UnrecognizedNamespace("rottentomatoes".into());
        assert_eq!(
            err.to_string(),
            "External site namespace unrecognized: rottentomatoes"
        );
    }

    #[test]
    fn database_display() {
        let err = Error::database("disk I/O error");
        assert!(err.to_string().contains("disk I/O error"));
    }

    #[test]
    fn network_and_api_display() {
        assert_eq!(
            Error::Network("connection refused".into()).to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            Error::Api("expected array".into()).to_string(),
            "API error: expected array"
        );
    }
}
