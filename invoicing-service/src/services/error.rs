use service_core::error::AppError;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single data-access statement.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Invoice not found")]
    NotFound,

    #[error("Failed to decode invoice row: {0}")]
    Decode(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Query cancelled after {}ms", .0.as_millis())]
    Cancelled(Duration),
}

impl RepositoryError {
    /// Label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RepositoryError::NotFound => "not_found",
            RepositoryError::Decode(_) => "decode_error",
            RepositoryError::Database(_) => "database_error",
            RepositoryError::Cancelled(_) => "cancelled",
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. } => RepositoryError::Decode(err),
            other => RepositoryError::Database(other),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound(anyhow::anyhow!("Invoice not found")),
            other => AppError::DatabaseError(anyhow::anyhow!(other.to_string())),
        }
    }
}
