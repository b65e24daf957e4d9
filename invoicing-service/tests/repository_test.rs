//! PostgreSQL-backed data access tests for invoicing-service.
//!
//! Requires a reachable database (`TEST_DATABASE_URL`); run with
//! `cargo test -- --ignored`.

mod common;

use common::{drop_schema, isolated_database_url};
use invoicing_service::models::{CreateInvoiceRequest, InvoiceStatus};
use invoicing_service::services::{
    Database, InvoiceRepository, PgInvoiceRepository, RepositoryError,
};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

async fn setup(statement_timeout: Duration) -> (PgInvoiceRepository, Database, String) {
    let (url, schema) = isolated_database_url().await;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test schema");
    let db = Database::from_pool(pool);
    db.run_migrations().await.expect("Failed to run migrations");
    (PgInvoiceRepository::new(db.clone(), statement_timeout), db, schema)
}

fn request(user_id: i64, amount: &str, description: &str) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        user_id,
        amount: amount.parse().unwrap(),
        description: description.to_string(),
        payment_method: "credit_card".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn create_then_get_returns_same_invoice() {
    let (repo, _db, schema) = setup(Duration::from_secs(5)).await;

    let created = repo
        .create_invoice(&request(123, "100.50", "Test invoice"))
        .await
        .expect("Failed to create invoice");

    assert!(created.id > 0);
    assert_eq!(created.status(), Some(InvoiceStatus::Pending));
    assert_eq!(created.created_at, created.updated_at);

    let fetched = repo.get_invoice(created.id).await.expect("Failed to get invoice");
    assert_eq!(fetched, created);
    assert_eq!(fetched.user_id, 123);
    assert_eq!(fetched.amount, "100.50".parse::<Decimal>().unwrap());
    assert_eq!(fetched.description, "Test invoice");
    assert_eq!(fetched.payment_method, "credit_card");

    drop_schema(&schema).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn get_missing_invoice_is_not_found() {
    let (repo, _db, schema) = setup(Duration::from_secs(5)).await;

    let result = repo.get_invoice(999).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));

    drop_schema(&schema).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn list_returns_every_invoice_of_the_user() {
    let (repo, _db, schema) = setup(Duration::from_secs(5)).await;

    assert!(repo.list_invoices_for_user(5).await.unwrap().is_empty());

    for description in ["a", "b", "c"] {
        repo.create_invoice(&request(5, "10", description)).await.unwrap();
    }
    repo.create_invoice(&request(6, "10", "other")).await.unwrap();

    let invoices = repo.list_invoices_for_user(5).await.unwrap();
    assert_eq!(invoices.len(), 3);
    assert!(invoices.iter().all(|invoice| invoice.user_id == 5));

    drop_schema(&schema).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn schema_rejects_non_positive_amounts() {
    let (repo, _db, schema) = setup(Duration::from_secs(5)).await;

    let result = repo.create_invoice(&request(5, "0", "free")).await;
    assert!(matches!(result, Err(RepositoryError::Database(_))));

    drop_schema(&schema).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn slow_statement_is_cancelled() {
    let (_, db, schema) = setup(Duration::from_secs(5)).await;
    let repo = PgInvoiceRepository::new(db.clone(), Duration::from_millis(50));

    // Hold an exclusive lock so the insert blocks until the timeout fires.
    let mut tx = db.pool().begin().await.unwrap();
    sqlx::query("LOCK TABLE invoices IN ACCESS EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await
        .unwrap();

    let result = repo.create_invoice(&request(5, "10", "blocked")).await;
    assert!(matches!(result, Err(RepositoryError::Cancelled(_))));

    tx.rollback().await.unwrap();
    drop_schema(&schema).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn health_check_round_trips() {
    let (repo, _db, schema) = setup(Duration::from_secs(5)).await;

    assert!(repo.health_check().await.is_ok());

    drop_schema(&schema).await;
}
