//! Storage seam between the business layer and the invoice table.

use crate::models::{CreateInvoiceRequest, Invoice};
use crate::services::error::RepositoryError;
use async_trait::async_trait;

/// Invoice persistence. Each method is one atomic statement.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Fetch one invoice; `RepositoryError::NotFound` when the row is absent.
    async fn get_invoice(&self, id: i64) -> Result<Invoice, RepositoryError>;

    /// All invoices owned by `user_id`, in storage order. Empty is not an error.
    async fn list_invoices_for_user(&self, user_id: i64) -> Result<Vec<Invoice>, RepositoryError>;

    /// Insert a `pending` invoice and return the stored row.
    async fn create_invoice(&self, input: &CreateInvoiceRequest) -> Result<Invoice, RepositoryError>;

    /// Cheap round trip used by health and readiness probes.
    async fn health_check(&self) -> Result<(), RepositoryError>;
}
