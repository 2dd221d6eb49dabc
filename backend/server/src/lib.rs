//! Documentation of the QMS prototype backend.
//!
//! # General Infrastructure
//! - Front-end prototypes (upload form, model viewer, dashboard, weather page)
//!   talk to this one Rust backend over plain JSON/multipart HTTP
//! - The backend owns no model: prediction and analysis requests are forwarded
//!   to the remote ML service configured via `PREDICT_URL`
//! - The weather page goes through `/weather`, which relays the configured
//!   forecast endpoint body as-is
//! - Uploaded CSVs land under `UPLOAD_DIR`; trained model artifacts are listed
//!   from `MODEL_DIR`
//! - Everything is unauthenticated and single-tenant, these are prototypes
//!
//!
//!
//! # Notes
//!
//! ## One origin
//! The front-end could call the ML service directly. Keeping one origin means
//! one CORS story, one place to bound request time, and one place where an
//! upstream failure becomes a `detail` string the pages already know how to
//! display. See [`predict`] for the proxy details.
//!
//! ## Failure surface
//! Nothing here retries. Every failure ends the current attempt with a
//! visible, specific response; recovery is the user resubmitting.
//!
//!
//!
//! # Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//! Run the backend.
//! ```sh
//! RUST_LOG=info cargo run -p backend
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod files;
pub mod predict;
pub mod routes;
pub mod state;
pub mod upload;
pub mod utils;

use routes::{echo_handler, hello_handler, ping_handler, reverse_handler, weather_handler};
use state::AppState;

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse()
                .map_err(|_| warn!("Skipping unparseable origin: {origin}"))
                .ok()
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/ping", get(ping_handler))
        .route("/api/hello", get(hello_handler))
        .route("/api/echo", post(echo_handler))
        .route("/api/reverse", post(reverse_handler))
        .route("/weather", get(weather_handler))
        .route("/upload", post(upload::upload_handler))
        .route("/api/files", get(files::files_handler))
        .route("/api/predict", post(predict::predict_handler))
        .route("/api/analyze", post(predict::analyze_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
