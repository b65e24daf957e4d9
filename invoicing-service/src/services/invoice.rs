//! Business layer: delegates invoice operations to the configured store.

use crate::models::{CreateInvoiceRequest, Invoice};
use crate::services::error::RepositoryError;
use crate::services::metrics::INVOICE_OPERATIONS_TOTAL;
use crate::services::repository::InvoiceRepository;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct InvoiceService {
    repository: Arc<dyn InvoiceRepository>,
}

impl InvoiceService {
    pub fn new(repository: Arc<dyn InvoiceRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn invoice(&self, id: i64) -> Result<Invoice, RepositoryError> {
        record("get_invoice", self.repository.get_invoice(id).await)
    }

    #[instrument(skip(self))]
    pub async fn invoices_for_user(&self, user_id: i64) -> Result<Vec<Invoice>, RepositoryError> {
        record(
            "list_invoices_for_user",
            self.repository.list_invoices_for_user(user_id).await,
        )
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create_invoice(&self, input: &CreateInvoiceRequest) -> Result<Invoice, RepositoryError> {
        record("create_invoice", self.repository.create_invoice(input).await)
    }

    pub async fn health_check(&self) -> Result<(), RepositoryError> {
        self.repository.health_check().await
    }
}

fn record<T>(operation: &str, result: Result<T, RepositoryError>) -> Result<T, RepositoryError> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    INVOICE_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    result
}
