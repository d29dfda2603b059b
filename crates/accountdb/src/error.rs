//! Error types for accountdb

use thiserror::Error;
use tokio_postgres::error::SqlState;

/// Result type alias for accountdb operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Establishing a connection failed; the driver error is kept as the source
    #[error("Connection error: {0}")]
    Connection(#[source] tokio_postgres::Error),

    /// Error reported by the store, passed through as-is
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A variadic parameter list was empty
    #[error("Empty parameter list for '{param}': at least one value is required")]
    EmptyParamList { param: &'static str },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Checking a connection out of the pool failed
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// The pool could not be built
    #[cfg(feature = "pool")]
    #[error("Pool build error: {0}")]
    PoolBuild(#[from] deadpool_postgres::BuildError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The driver error behind this one, for query, connect and pooled-connect failures.
    pub fn postgres_error(&self) -> Option<&tokio_postgres::Error> {
        match self {
            Self::Query(err) | Self::Connection(err) => Some(err),
            #[cfg(feature = "pool")]
            Self::Pool(deadpool_postgres::PoolError::Backend(err)) => Some(err),
            _ => None,
        }
    }

    /// The SQLSTATE reported by the server, if this is a server-side error.
    ///
    /// Startup failures such as a bad password (28P01) or unknown database (3D000)
    /// report one too.
    pub fn sql_state(&self) -> Option<&SqlState> {
        self.postgres_error().and_then(tokio_postgres::Error::code)
    }

    /// Name of the violated constraint, if the server reported one.
    pub fn constraint(&self) -> Option<&str> {
        self.postgres_error()
            .and_then(tokio_postgres::Error::as_db_error)
            .and_then(|db| db.constraint())
    }

    /// Check if this is a unique violation error (SQLSTATE 23505)
    pub fn is_unique_violation(&self) -> bool {
        self.sql_state() == Some(&SqlState::UNIQUE_VIOLATION)
    }

    /// Check if this error was raised before anything reached the store
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::EmptyParamList { .. } | Self::Validation(_))
    }
}
