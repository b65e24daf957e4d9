//! Application startup and lifecycle management.

use crate::config::InvoicingConfig;
use crate::handlers::{health, invoices};
use crate::middleware::{auth_middleware, metrics_middleware};
use crate::services::{
    init_metrics, Database, InvoiceRepository, InvoiceService, JwtVerifier, PgInvoiceRepository,
};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub invoices: InvoiceService,
    pub jwt: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(repository: Arc<dyn InvoiceRepository>, jwt: JwtVerifier) -> Self {
        Self {
            invoices: InvoiceService::new(repository),
            jwt: Arc::new(jwt),
        }
    }
}

/// Build the HTTP router.
///
/// Invoice routes live under `/api` behind the token gate; health, readiness
/// and metrics stay open.
pub fn build_router(state: AppState) -> Router {
    let invoice_routes = Router::new()
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route(
            "/invoices/",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/invoices/:id", get(invoices::get_invoice))
        .route_layer(from_fn_with_state(state.jwt.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_handler))
        .nest("/api", invoice_routes)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: InvoicingConfig) -> Result<Self, AppError> {
        init_metrics();

        let jwt = JwtVerifier::new(&config.jwt).map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize JWT verifier");
            AppError::ConfigError(e)
        })?;

        let db = Database::new(
            config.database.connect_options()?,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        if config.database.run_migrations {
            db.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        }

        let repository = Arc::new(PgInvoiceRepository::new(
            db,
            config.database.statement_timeout,
        ));
        let router = build_router(AppState::new(repository, jwt));

        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Invoicing service listener bound");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let addr: SocketAddr = self.listener.local_addr()?;
        tracing::info!("Listening on {}", addr);

        axum::serve(self.listener, self.router).await
    }
}
