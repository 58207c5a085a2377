//! Error types for the itinerary cache library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all cache and network operations.
///
/// Lower layers (storage, remote API, snapshot, queue) always return this
/// type. The [`crate::ItineraryCache`] facade is the only place where errors
/// are turned into default values for screens.
#[derive(Error, Debug)]
pub enum WayfarerError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Transport-level HTTP failures (connection refused, DNS, TLS...)
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },
    /// The server rejected the session (HTTP 401)
    #[error("Session expired or unauthorized")]
    Unauthorized,
    /// An operation exceeded its deadline
    #[error("Operation '{operation}' timed out")]
    Timeout { operation: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> WayfarerError {
        WayfarerError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WayfarerError {
        WayfarerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WayfarerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a `spawn_blocking` join failure.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }

    /// True when the server rejected the session.
    ///
    /// Authorization failures are reported to the user by the session layer,
    /// so the cache never surfaces its own notice for them.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::Http { status, .. } => *status == 401,
            Self::Network { source } => source
                .status()
                .is_some_and(|status| status.as_u16() == 401),
            _ => false,
        }
    }

    /// True when repeating the request later may succeed: the server was
    /// unreachable, too slow, or failed on its side.
    ///
    /// Client errors other than these are rejections of the request itself;
    /// queueing them would only make every later sync fail the same way.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { source } => source
                .status()
                .map_or(true, |status| status.is_server_error()),
            Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// True for a 404 answer from the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WayfarerError::database(message).with_source(e))
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, WayfarerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_classification() {
        assert!(WayfarerError::Unauthorized.is_unauthorized());
        assert!(
            WayfarerError::Http {
                status: 401,
                message: "expired".to_string()
            }
            .is_unauthorized()
        );
        assert!(
            !WayfarerError::Http {
                status: 500,
                message: "boom".to_string()
            }
            .is_unauthorized()
        );
        assert!(
            !WayfarerError::Timeout {
                operation: "probe".to_string()
            }
            .is_unauthorized()
        );
    }

    #[test]
    fn test_invalid_input_builder() {
        let error = WayfarerError::invalid_input("records").with_reason("expected a list");
        assert_eq!(
            error.to_string(),
            "Invalid input for field 'records': expected a list"
        );
    }

    #[test]
    fn test_retryable_classification() {
        let server = WayfarerError::Http {
            status: 503,
            message: "down".to_string(),
        };
        let rejected = WayfarerError::Http {
            status: 422,
            message: "title required".to_string(),
        };
        assert!(server.is_retryable());
        assert!(!rejected.is_retryable());
        assert!(
            WayfarerError::Timeout {
                operation: "create".to_string()
            }
            .is_retryable()
        );
        assert!(!WayfarerError::Unauthorized.is_retryable());
    }

    #[test]
    fn test_not_found_classification() {
        let error = WayfarerError::Http {
            status: 404,
            message: "gone".to_string(),
        };
        assert!(error.is_not_found());
        assert!(!WayfarerError::Unauthorized.is_not_found());
    }
}
