//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate and propagate the request ID
//! - Build the outbound copy of an inbound request
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body is buffered once so the outbound copy carries identical bytes
//! - `Host` is dropped; the client derives it from the backend address

use axum::body::{Body, Bytes};
use axum::http::{header, request::Parts, HeaderMap, HeaderName, Request};

use crate::load_balancer::Server;

/// Correlation header set on every request and echoed on the response.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Response header naming the backend that served the request.
pub const X_FORWARDED_SERVER: HeaderName = HeaderName::from_static("x-forwarded-server");

/// Read the request ID set by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Build a request to `server` with the inbound method, headers and body.
pub fn build_forward_request(
    parts: &Parts,
    body: Bytes,
    server: &Server,
) -> Result<Request<Body>, axum::http::Error> {
    let mut request = Request::builder()
        .method(parts.method.clone())
        .uri(server.url().as_str())
        .body(Body::from(body))?;

    let headers = request.headers_mut();
    for (name, value) in parts.headers.iter() {
        if name != header::HOST {
            headers.append(name.clone(), value.clone());
        }
    }
    Ok(request)
}
