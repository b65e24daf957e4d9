use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::ApiResponse;

const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Service Unavailable")]
    ServiceUnavailable,

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the response envelope.
    ///
    /// Internal and configuration failures are reduced to a generic message so
    /// that secrets and raw error chains never reach the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(err)
            | AppError::Unauthorized(err)
            | AppError::NotFound(err)
            | AppError::DatabaseError(err) => err.to_string(),
            AppError::ServiceUnavailable => "Service unavailable".to_string(),
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                GENERIC_INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::InternalError(err) | AppError::ConfigError(err) => {
                tracing::error!(error = ?err, "Request failed with internal error");
            }
            AppError::DatabaseError(err) => {
                tracing::error!(error = %err, "Request failed with database error");
            }
            _ => {}
        }

        ApiResponse::<()>::failure(status, self.public_message()).into_response()
    }
}
