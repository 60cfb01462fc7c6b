//! HTTP server setup and request forwarding.
//!
//! # Responsibilities
//! - Create the Axum Router with the proxy handler
//! - Wire up middleware (request ID, tracing)
//! - Select a server, forward the request, unwrap the response envelope
//! - Start and stop the health monitor with the listener

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::LbConfig;
use crate::health::HealthMonitor;
use crate::http::error::ProxyError;
use crate::http::request::{build_forward_request, request_id, X_FORWARDED_SERVER};
use crate::http::response::{json_response, unwrap_envelope};
use crate::lifecycle::recv_shutdown;
use crate::load_balancer::{PoolError, Server, ServerPool};
use crate::observability::metrics;

/// Outbound client shared by all requests.
pub type ForwardClient = Client<HttpConnector, Body>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<ServerPool>,
    pub client: ForwardClient,
    pub backend_timeout: Duration,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(pool: Arc<ServerPool>, config: &LbConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            pool,
            client,
            backend_timeout: config.timeouts.backend_request,
            max_body_bytes: config.limits.max_body_bytes,
        }
    }
}

/// Build the Axum router with all middleware layers.
///
/// Every path is served by the same handler; the backend always receives
/// the request at its configured address.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(proxy_handler))
        .fallback(proxy_handler)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    config: LbConfig,
    pool: Arc<ServerPool>,
}

impl HttpServer {
    /// Create a server with a round-robin pool built from `config.servers`.
    pub fn new(config: LbConfig) -> Result<Self, PoolError> {
        let pool = Arc::new(ServerPool::from_addresses(&config.servers)?);
        Ok(Self::with_pool(config, pool))
    }

    /// Create a server over an existing pool.
    pub fn with_pool(config: LbConfig, pool: Arc<ServerPool>) -> Self {
        let router = build_router(AppState::new(pool.clone(), &config));
        Self {
            router,
            config,
            pool,
        }
    }

    /// Run until `shutdown` fires, then drain requests and stop health checks.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            servers = self.pool.len(),
            "HTTP server starting"
        );

        let monitor = HealthMonitor::spawn(&self.pool, &self.config.health_check, &shutdown);

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(recv_shutdown(shutdown))
            .await;

        if let Err(e) = served {
            monitor.abort();
            monitor.join().await;
            return Err(e);
        }
        monitor.join().await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Main proxy handler.
/// Selects a server, forwards the request and unwraps the response envelope.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();

    let server = match state.pool.select() {
        Some(server) => server,
        None => {
            tracing::error!(request_id = %request_id, "No healthy server available");
            metrics::record_request(method.as_str(), 503, metrics::NO_BACKEND, start_time);
            return ProxyError::NoHealthyServer.into_response();
        }
    };

    tracing::info!(
        request_id = %request_id,
        method = %method,
        target = %server.address(),
        "Proxying request"
    );

    let mut response = match forward(&state, &server, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                target = %server.address(),
                error = %e,
                "Request to backend failed"
            );
            e.into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(server.address()) {
        response.headers_mut().insert(X_FORWARDED_SERVER, value);
    }

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        server.address(),
        start_time,
    );
    response
}

/// One attempt against one backend: no retries on any failure.
async fn forward(
    state: &AppState,
    server: &Server,
    request: Request<Body>,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, state.max_body_bytes)
        .await
        .map_err(ProxyError::RequestBody)?;

    tracing::debug!(body_len = body.len(), "Request body buffered");

    let outbound = build_forward_request(&parts, body, server)?;

    let exchange = async {
        let response = state.client.request(outbound).await?;
        let status = response.status();
        let body = axum::body::to_bytes(Body::new(response.into_body()), state.max_body_bytes)
            .await
            .map_err(ProxyError::ResponseBody)?;
        Ok::<_, ProxyError>((status, body))
    };

    let (status, body) = tokio::time::timeout(state.backend_timeout, exchange)
        .await
        .map_err(|_| ProxyError::UpstreamTimeout(state.backend_timeout))??;

    tracing::debug!(
        target = %server.address(),
        status = %status,
        body_len = body.len(),
        "Backend responded"
    );

    let payload = unwrap_envelope(&body)?;
    Ok(json_response(payload))
}
