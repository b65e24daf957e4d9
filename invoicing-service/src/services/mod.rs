//! Services module for invoicing-service.

pub mod database;
pub mod error;
pub mod invoice;
pub mod jwt;
pub mod metrics;
pub mod repository;

pub use database::{Database, PgInvoiceRepository};
pub use error::RepositoryError;
pub use invoice::InvoiceService;
pub use jwt::{Claims, JwtVerifier, TokenError};
pub use metrics::{get_metrics, init_metrics};
pub use repository::InvoiceRepository;
