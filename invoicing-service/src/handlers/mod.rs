//! HTTP handlers for invoicing-service.

pub mod health;
pub mod invoices;
