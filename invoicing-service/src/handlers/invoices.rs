//! Invoice handlers.
//!
//! Each handler parses its input, delegates to the business layer and renders
//! the result through the response envelope.

use axum::extract::{rejection::QueryRejection, Path, Query, State};
use serde::Deserialize;
use service_core::envelope::ApiResponse;
use service_core::error::AppError;

use crate::{
    middleware::AuthUser,
    models::{CreateInvoiceRequest, Invoice},
    services::RepositoryError,
    startup::AppState,
    utils::ValidatedJson,
};

#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    pub user_id: Option<String>,
}

fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse().ok())
}

/// `GET /api/invoices?user_id=<int>`
pub async fn list_invoices(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    query: Result<Query<ListInvoicesQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<Invoice>>, AppError> {
    let raw = query.ok().and_then(|Query(q)| q.user_id);
    let user_id = parse_id(raw.as_deref())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid user ID")))?;

    tracing::info!(user_id = user_id, caller = %caller.username, "Listing invoices");

    let invoices = state.invoices.invoices_for_user(user_id).await?;

    Ok(ApiResponse::ok(invoices))
}

/// `GET /api/invoices/:id`
///
/// Every failure is reported as 404; storage failures are only distinguished
/// in the logs.
pub async fn get_invoice(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<Invoice>, AppError> {
    let invoice_id = parse_id(Some(&raw_id))
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid invoice ID")))?;

    tracing::info!(invoice_id = invoice_id, caller = %caller.username, "Fetching invoice");

    match state.invoices.invoice(invoice_id).await {
        Ok(invoice) => Ok(ApiResponse::ok(invoice)),
        Err(RepositoryError::NotFound) => {
            Err(AppError::NotFound(anyhow::anyhow!("Invoice not found")))
        }
        Err(e) => {
            tracing::error!(
                invoice_id = invoice_id,
                error = %e,
                kind = e.kind(),
                "Storage failure while fetching invoice, reporting as not found"
            );
            Err(AppError::NotFound(anyhow::anyhow!("Invoice not found")))
        }
    }
}

/// `POST /api/invoices`
pub async fn create_invoice(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateInvoiceRequest>,
) -> Result<ApiResponse<Invoice>, AppError> {
    tracing::info!(
        user_id = payload.user_id,
        amount = %payload.amount,
        caller = %caller.username,
        "Creating invoice"
    );

    let invoice = state.invoices.create_invoice(&payload).await?;

    Ok(ApiResponse::created(invoice))
}
