//! # quotedrop: upload-and-notify backend
//!
//! `quotedrop` is a small HTTP backend behind a browser frontend. It stores
//! uploaded files on local disk under deterministic date-stamped names,
//! maintains a flat-file list of email recipients, and after each upload
//! fans out one notification per recipient to an external transactional
//! email API carrying the uploaded file's URL.
//!
//! ## Request flow
//!
//! `POST /uploadFile` receives a single multipart `file` field, writes the
//! bytes into the upload directory as `MMDDYYYY-<sanitized name>`, and
//! responds with the public `/uploads/...` path immediately. Notification
//! delivery then runs as a detached task over a snapshot of the recipient
//! list: each recipient gets one independent HTTP call, failures are logged
//! and skipped, and the uploader never learns the outcome. `GET
//! /uploads/{name}` serves stored files byte-for-byte.
//!
//! The recipient list lives in a newline-delimited text file managed by
//! [`recipients::RecipientStore`], which owns the file and serializes every
//! operation so concurrent handlers cannot lose updates. `POST /saveEmail`,
//! `DELETE /deleteEmail` and `GET /emails.txt` are thin wrappers over its
//! add/remove/list operations.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use quotedrop::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = quotedrop::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     quotedrop::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod errors;
pub mod notify;
mod openapi;
pub mod recipients;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
mod test;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{self, HeaderValue},
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::{notify::Notifier, openapi::ApiDoc, recipients::RecipientStore, storage::UploadStore};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub uploads: UploadStore,
    pub recipients: Arc<RecipientStore>,
    pub notifier: Notifier,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE]))
}

/// Build the application router with all endpoints and middleware.
///
/// - Upload endpoint with its own body limit
/// - Recipient list management endpoints
/// - Static serving of stored uploads
/// - API reference at `/docs`
/// - CORS and tracing layers
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let cors = create_cors_layer(&state.config)?;

    // Upload route with custom body limit (other routes use the default)
    let upload_limit = state.config.storage.max_upload_bytes as usize;
    let upload_router = Router::new().route(
        "/uploadFile",
        post(api::handlers::uploads::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
    );

    let router = Router::new()
        .merge(upload_router)
        .route("/", get(api::handlers::status::root))
        .route("/saveEmail", post(api::handlers::recipients::save_email))
        // DELETE is canonical; POST covers clients that cannot attach a body to DELETE
        .route(
            "/deleteEmail",
            delete(api::handlers::recipients::delete_email).post(api::handlers::recipients::delete_email),
        )
        .route("/emails.txt", get(api::handlers::recipients::list_emails))
        .nest_service(storage::PUBLIC_PREFIX, ServeDir::new(state.uploads.root()))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state.clone())
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// The assembled application.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] prepares the upload directory and the
///    shared state, and assembles the router
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles requests
///    until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        tracing::debug!("Starting quotedrop with configuration: {:#?}", config);

        let uploads = UploadStore::new(&config.storage.upload_dir).await?;
        info!("Upload directory '{}' is ready", config.storage.upload_dir.display());

        let recipients = Arc::new(RecipientStore::new(&config.storage.recipients_file));
        let notifier = Notifier::new(config.email.clone(), config.public_url.clone());

        let state = AppState {
            config: Arc::new(config.clone()),
            uploads,
            recipients,
            notifier,
        };

        let router = build_router(&state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Server listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
