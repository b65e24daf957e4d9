use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

/// JSON body that has been parsed and validated.
///
/// Unparsable bodies are rejected with `Invalid request body`; bodies that
/// parse but fail validation with `Missing required fields`.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            AppError::BadRequest(anyhow::anyhow!("Invalid request body"))
        })?;

        value.validate().map_err(|e| {
            tracing::debug!(error = %e, "Request body failed validation");
            AppError::BadRequest(anyhow::anyhow!("Missing required fields"))
        })?;

        Ok(ValidatedJson(value))
    }
}
