//! HTTP gateway in front of the Foldify prediction backend.
//!
//! Serves fresh forms, validates them, and forwards valid submissions with
//! the caller's session. Every route below runs behind the session
//! middleware, which keeps the anonymous `session` cookie alive.

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod commands;
pub mod config;
pub mod dto;
pub mod error;
pub mod inflight;
pub mod session;
pub mod state;

use commands::{dashboard, forms};
use config::Config;
use dto::HealthDto;
use session::session_middleware;
use state::State;

async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .route("/forms/{tool}/new", get(forms::new_form))
        .route("/forms/{tool}/validate", post(forms::validate_form))
        .route("/forms/{tool}/submit", post(forms::submit_form))
        .route("/dashboard/jobs", delete(dashboard::delete_jobs))
        .route("/dashboard/jobs/{scope}", get(dashboard::list_jobs))
        .route("/dashboard/job/{job_name}", delete(dashboard::delete_job))
        .route("/dashboard/job/{job_name}/publicity", post(dashboard::switch_publicity))
        .route("/dashboard/job/{job_name}/download", get(dashboard::zip_available))
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            session_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: Config) -> std::io::Result<()> {
    info!("Backend at {}", config.backend_url);
    let state = State::new(config);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Gateway running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
