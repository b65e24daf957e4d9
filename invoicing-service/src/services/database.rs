//! Database service for invoicing-service.

use crate::models::{CreateInvoiceRequest, Invoice, InvoiceStatus};
use crate::services::error::RepositoryError;
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::repository::InvoiceRepository;
use async_trait::async_trait;
use chrono::Utc;
use service_core::error::AppError;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::future::Future;
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(options), fields(service = "invoicing-service"))]
    pub async fn new(
        options: PgConnectOptions,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

/// PostgreSQL-backed invoice store.
///
/// Every statement runs under `statement_timeout`; dropping the returned
/// future (client gone, request aborted) cancels the statement as well.
#[derive(Clone)]
pub struct PgInvoiceRepository {
    db: Database,
    statement_timeout: Duration,
}

impl PgInvoiceRepository {
    pub fn new(db: Database, statement_timeout: Duration) -> Self {
        Self {
            db,
            statement_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let timer = DB_QUERY_DURATION
            .with_label_values(&[operation])
            .start_timer();

        let result = match tokio::time::timeout(self.statement_timeout, query).await {
            Ok(result) => result.map_err(RepositoryError::from),
            Err(_) => Err(RepositoryError::Cancelled(self.statement_timeout)),
        };

        timer.observe_duration();
        result
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    #[instrument(skip(self), fields(invoice_id = %id))]
    async fn get_invoice(&self, id: i64) -> Result<Invoice, RepositoryError> {
        let query = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, user_id, amount, description, status, payment_method, created_at, updated_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool());

        self.bounded("get_invoice", query)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_invoices_for_user(&self, user_id: i64) -> Result<Vec<Invoice>, RepositoryError> {
        let query = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, user_id, amount, description, status, payment_method, created_at, updated_at
            FROM invoices
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool());

        self.bounded("list_invoices_for_user", query).await
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    async fn create_invoice(&self, input: &CreateInvoiceRequest) -> Result<Invoice, RepositoryError> {
        let now = Utc::now();
        let query = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (user_id, amount, description, status, payment_method, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, user_id, amount, description, status, payment_method, created_at, updated_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.amount)
        .bind(&input.description)
        .bind(InvoiceStatus::Pending.as_str())
        .bind(&input.payment_method)
        .bind(now)
        .fetch_one(self.db.pool());

        let invoice = self.bounded("create_invoice", query).await?;

        info!(invoice_id = invoice.id, "Invoice created");

        Ok(invoice)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        let query = sqlx::query("SELECT 1").execute(self.db.pool());
        self.bounded("health_check", query).await.map(|_| ())
    }
}
