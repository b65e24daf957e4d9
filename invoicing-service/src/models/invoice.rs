//! Invoice model for invoicing-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            "cancelled" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }
}

/// Persisted invoice row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: i64,
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn status(&self) -> Option<InvoiceStatus> {
        InvoiceStatus::from_string(&self.status)
    }
}

/// Body of `POST /api/invoices`.
///
/// Absent fields deserialize to zero values so that an incomplete body is
/// reported as missing fields rather than as malformed JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_invoice_request"))]
pub struct CreateInvoiceRequest {
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "payment_method is required"))]
    pub payment_method: String,
}

fn validate_invoice_request(req: &CreateInvoiceRequest) -> Result<(), ValidationError> {
    if req.user_id == 0 {
        return Err(ValidationError::new("user_id_required"));
    }
    if req.amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_not_positive"));
    }
    Ok(())
}
