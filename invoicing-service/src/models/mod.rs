//! Domain models for invoicing-service.

mod invoice;

pub use invoice::{CreateInvoiceRequest, Invoice, InvoiceStatus};
