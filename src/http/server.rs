//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router mounting the sitemap as the catch-all handler
//! - Wire up middleware (request ID, tracing, timeout, limits, panics)
//! - Bind server to listener and stop on shutdown broadcast
//! - Answer unstructured handler failures with a generic 500
//! - Record per-request metrics
//!
//! # Design Decisions
//! - Handler chains are synchronous and run on the blocking pool, so a slow
//!   handler never stalls the runtime workers
//! - A request timeout answers the client; the blocking task itself runs to
//!   completion
//! - Body limit sits outside the timeout so rejected bodies never start a chain

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::RequestContext;
use crate::http::response::MatchedRoute;
use crate::observability::metrics;
use crate::routing::SitemapRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<SitemapRouter>,
    pub max_body_size: usize,
}

/// HTTP server serving one compiled sitemap.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig, router: Arc<SitemapRouter>) -> Self {
        let state = AppState {
            router,
            max_body_size: config.limits.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CatchPanicLayer::new())
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_connections,
            ));

        Router::new()
            .route("/{*path}", any(sitemap_handler))
            .route("/", any(sitemap_handler))
            .with_state(state)
            .layer(layers)
    }

    /// The fully layered application, for in-process use.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_connections = self.config.listener.max_connections,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Catch-all handler: buffers the body and answers from the sitemap.
async fn sitemap_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %parts.uri.path(), error = %err, "Failed to read request body");
            metrics::record_request(&method, 413, metrics::UNMATCHED_ROUTE, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let request = RequestContext::from_parts(parts, body);
    let request_id = request.request_id.clone();
    let path = request.path().to_string();

    let router = Arc::clone(&state.router);
    let outcome = tokio::task::spawn_blocking(move || router.respond(&request)).await;

    let response = match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %err,
                "Handler failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
        Err(err) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %err,
                "Handler panicked"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    };

    let route = response
        .extensions()
        .get::<MatchedRoute>()
        .map(|matched| matched.0.as_str())
        .unwrap_or(metrics::UNMATCHED_ROUTE);
    metrics::record_request(&method, response.status().as_u16(), route, start_time);

    response
}
