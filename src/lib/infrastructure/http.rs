//! HTTP Server

use std::{
    net::{Ipv4Addr, SocketAddr, TcpListener},
    time::Duration,
};

use anyhow::Context;
use axum::{
    extract::Request,
    routing::{get, post},
    Json, Router,
};
use axum_server::Handle;
use clap::Parser;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::debug;
use utoipa::OpenApi;

use crate::domain::email::service::DispatchService;

pub mod errors;
pub mod handlers;
pub mod open_api;
pub mod state;

use self::errors::ApiError;
use self::handlers::panic_handler;
use self::open_api::ApiDocs;
use self::state::AppState;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub fn new<D: DispatchService>(
        state: AppState<D>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(state);

        let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
        let listener = TcpListener::bind(address)
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server until a shutdown signal arrives, then drains
    /// in-flight requests before returning.
    #[mutants::skip]
    pub async fn run(self) -> anyhow::Result<()> {
        let handle = Handle::new();

        // The signal watcher only triggers graceful shutdown on the handle;
        // the server future itself runs to completion so the drain window
        // is honored.
        tokio::spawn(shutdown_signal(Some(handle.clone())));

        self.serve(handle).await
    }

    async fn serve(self, handle: Handle) -> anyhow::Result<()> {
        debug!("listening on {}", self.listener.local_addr()?);

        axum_server::from_tcp(self.listener)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await
            .context("server error")
    }
}

/// Create the application's router
pub fn router<D: DispatchService>(state: AppState<D>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        tracing::info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .route("/", get(handlers::health::handler))
        .route("/api/config", get(handlers::config::handler))
        .route("/api/contact", post(handlers::contact::handler))
        .route("/api/send-email", post(handlers::send_email::handler))
        .route("/api/openapi.json", get(Json(ApiDocs::openapi())))
        .fallback(not_found)
        .layer(trace_layer)
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Fixed body for any route outside the declared set
async fn not_found() -> ApiError {
    ApiError::new_404("Endpoint not found")
}

#[mutants::skip]
async fn shutdown_signal(handle: Option<Handle>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    if let Some(handle) = handle {
        debug!("shutting down gracefully");
        handle.graceful_shutdown(Some(Duration::from_secs(10)));
    }
}
