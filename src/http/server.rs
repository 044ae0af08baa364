//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the posts routes
//! - Wire up middleware (tracing, timeout, CORS, request ID, auth gate)
//! - Construct the upstream collaborators from configuration
//! - Bind the server to a listener and serve until shutdown
//!
//! # Layering (outermost first)
//! ```text
//! request id → trace → timeout → CORS → metrics → auth gate → handler
//! ```
//! CORS sits outside the auth gate so denials still carry the permissive
//! cross-origin headers and stay visible to browser callers.

use axum::{
    body::Body,
    http::{header, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::auth::{auth_gate, AuthPolicy, HttpTokenVerifier, RouteId, TokenVerifier};
use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::observability::metrics;
use crate::sanitize::{Sanitizer, StripTags};
use crate::store::{DocumentStore, PathResolver, RtdbClient};

/// Application state injected into handlers and the auth gate.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub sanitizer: Arc<dyn Sanitizer>,
    pub resolver: Arc<PathResolver>,
    pub policy: AuthPolicy,
    pub order_by_created: bool,
}

/// Failure constructing the gateway from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid {field} url: {source}")]
    InvalidUrl {
        field: &'static str,
        source: url::ParseError,
    },

    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
}

impl AppState {
    /// Build the production collaborators from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, BuildError> {
        let upstream_timeout = Duration::from_secs(config.timeouts.upstream_secs);

        let store_url =
            Url::parse(&config.store.base_url).map_err(|source| BuildError::InvalidUrl {
                field: "store.base_url",
                source,
            })?;
        let verify_url =
            Url::parse(&config.auth.verify_url).map_err(|source| BuildError::InvalidUrl {
                field: "auth.verify_url",
                source,
            })?;

        Ok(Self {
            store: Arc::new(RtdbClient::new(store_url, upstream_timeout)?),
            verifier: Arc::new(HttpTokenVerifier::new(
                verify_url,
                config.auth.request_name_claim,
                upstream_timeout,
            )?),
            sanitizer: Arc::new(StripTags),
            resolver: Arc::new(PathResolver::new(config.store.namespace.clone())),
            policy: AuthPolicy::new(config.auth.require_auth_for.iter().copied()),
            order_by_created: config.store.order_by_created,
        })
    }
}

/// HTTP server for the posts gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new server with production collaborators.
    pub fn new(config: GatewayConfig) -> Result<Self, BuildError> {
        let state = AppState::from_config(&config)?;
        Ok(Self::with_state(config, state))
    }

    /// Create a server around an explicit state, for substituted collaborators.
    pub fn with_state(config: GatewayConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([
                header::ORIGIN,
                header::HeaderName::from_static("x-requested-with"),
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ]);

        Router::new()
            .route(
                "/posts",
                get(handlers::read_posts).post(handlers::create_post),
            )
            .route(
                "/posts/",
                get(handlers::read_posts).post(handlers::create_post),
            )
            .route("/posts/{id}", get(handlers::read_posts))
            .fallback(handlers::not_found)
            .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
            .layer(middleware::from_fn(track_request))
            .layer(cors)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .with_state(state)
    }

    /// Run the server until a shutdown is signalled or the process is
    /// interrupted.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            namespace = %self.config.store.namespace,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = crate::lifecycle::signals::interrupted() => {}
                    _ = shutdown.recv() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Record request count and latency, labeled by route and status.
async fn track_request(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = RouteId::classify(request.method(), request.uri().path());

    let response = next.run(request).await;

    metrics::record_request(&method, route, response.status().as_u16(), start);
    response
}
