//! Bearer-token gate in front of every invoice route.
//!
//! The `Authorization` header carries the raw token; no `Bearer ` scheme is
//! stripped. Verified identities are stored in request extensions.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;
use std::sync::Arc;

use crate::services::{metrics::AUTH_ATTEMPTS_TOTAL, JwtVerifier};

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Middleware to require a valid token.
pub async fn auth_middleware(
    State(verifier): State<Arc<JwtVerifier>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(value) = req
        .headers()
        .get(header::AUTHORIZATION)
        .filter(|value| !value.is_empty())
    else {
        AUTH_ATTEMPTS_TOTAL.with_label_values(&["missing_header"]).inc();
        tracing::warn!(path = %req.uri().path(), "Request rejected: missing Authorization header");
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Authorization header is required"
        )));
    };

    let Ok(token) = value.to_str() else {
        AUTH_ATTEMPTS_TOTAL.with_label_values(&["invalid_token"]).inc();
        tracing::warn!("Request rejected: Authorization header is not valid text");
        return Err(AppError::Unauthorized(anyhow::anyhow!("Invalid token")));
    };

    let claims = match verifier.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            AUTH_ATTEMPTS_TOTAL.with_label_values(&["invalid_token"]).inc();
            tracing::warn!(error = %e, "Request rejected: invalid token");
            return Err(AppError::Unauthorized(anyhow::anyhow!("Invalid token")));
        }
    };

    AUTH_ATTEMPTS_TOTAL.with_label_values(&["authenticated"]).inc();
    tracing::info!(username = %claims.username, "User authenticated");

    req.extensions_mut().insert(AuthenticatedUser {
        username: claims.username,
    });

    Ok(next.run(req).await)
}

/// Extractor to easily get the caller in handlers
pub struct AuthUser(pub AuthenticatedUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Authenticated user missing from request extensions"
                ))
            })?;

        Ok(AuthUser(user.clone()))
    }
}
