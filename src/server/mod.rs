//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::service::DispatchService;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatch_service: Arc<DispatchService>,
}

impl AppState {
    /// Production state: dispatch through the SMTP resolver
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let dispatch_service = Arc::new(DispatchService::new(Arc::new(config.mail.clone())));

        Self {
            config,
            dispatch_service,
        }
    }

    pub fn with_dispatch_service(config: Config, dispatch_service: DispatchService) -> Self {
        Self {
            config: Arc::new(config),
            dispatch_service: Arc::new(dispatch_service),
        }
    }
}

/// Build the HTTP router for the callable endpoints
pub fn build_router(state: AppState) -> Router {
    // Callables are invoked from the web and mobile clients directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready))
        .route(
            "/sendVerificationEmail",
            post(api::callable::send_verification_email),
        )
        .route("/testSendEmail", post(api::callable::test_send_email))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Router plus the `/metrics` endpoint
pub fn build_router_with_metrics(
    state: AppState,
    prometheus_handle: Option<PrometheusHandle>,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(Arc::new(prometheus_handle));

    build_router(state).merge(metrics_router)
}

/// Run the HTTP server until SIGINT/SIGTERM
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let http_addr = config.http_addr();
    let state = AppState::new(config);

    info!(
        strategy = %state.dispatch_service.config().strategy,
        sender = %state.dispatch_service.config().sender_address(),
        "Mail dispatch configured"
    );

    let app = build_router_with_metrics(state, prometheus_handle);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
