//! Error types for the database client

use guidebook_common::{config_error, not_found, GuidebookError};
use thiserror::Error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// A row that an update targets does not exist
    #[error("Record not found: {0}")]
    NotFound(String),
}

impl From<DbError> for GuidebookError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => not_found(what),
            DbError::ConfigError(msg) | DbError::UrlError(msg) => config_error(msg),
            other => GuidebookError::DatabaseError(other.to_string()),
        }
    }
}
