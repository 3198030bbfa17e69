//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, limits, timeout)
//! - Bind server to listener
//! - Serve liveness and health probes

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::evm::EntityRelay;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::{entity, handlers};
use crate::lifecycle::shutdown_signal;
use crate::move_chain::EntryService;

/// Application state injected into handlers.
///
/// A path whose chain is disabled in configuration is `None`, and its
/// endpoints answer 503.
#[derive(Clone, Default)]
pub struct AppState {
    pub entries: Option<Arc<EntryService>>,
    pub entities: Option<Arc<dyn EntityRelay>>,
}

impl AppState {
    pub fn entry_service(&self) -> RelayResult<&EntryService> {
        self.entries
            .as_deref()
            .ok_or(RelayError::Unavailable("Move chain relay"))
    }

    pub fn entity_relay(&self) -> RelayResult<&dyn EntityRelay> {
        self.entities
            .as_deref()
            .ok_or(RelayError::Unavailable("EVM relay"))
    }
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &RelayConfig, state: AppState) -> Self {
        Self {
            router: build_router(config, state),
        }
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal arrives.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Requests exceeding `timeouts.request_secs` are answered with 408.
pub fn build_router(config: &RelayConfig, state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                request_id = %request_id(request),
                method = %request.method(),
                path = %request.uri().path(),
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.timeouts.request_secs),
        ));

    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health))
        .route("/api/create-list", post(handlers::create_list))
        .route("/api/create-entry", post(handlers::create_entry))
        .route("/api/get-function-value", post(handlers::list_entries))
        .route("/addEntity", post(entity::add_entity))
        .route("/entities/{address}", get(entity::list_entities))
        .with_state(state)
        .layer(middleware)
}

/// GET /
async fn liveness() -> &'static str {
    "Server is running"
}

/// GET /health
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let move_chain = match &state.entries {
        Some(service) => probe(service.chain().is_healthy().await),
        None => "disabled",
    };
    let evm = match &state.entities {
        Some(relay) => probe(relay.is_healthy().await),
        None => "disabled",
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "move_chain": move_chain,
        "evm": evm,
    }))
}

fn probe(healthy: bool) -> &'static str {
    if healthy {
        "up"
    } else {
        "down"
    }
}
