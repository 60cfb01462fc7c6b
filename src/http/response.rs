//! Response transformation.
//!
//! Backends answer with an envelope such as
//! `{"json": {"game": "COD", "points": 20}}`; clients receive only the
//! value of the `"json"` field.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use crate::http::error::ProxyError;

/// Envelope field whose value becomes the client-visible body.
pub const ENVELOPE_FIELD: &str = "json";

/// Extract and re-serialize the envelope payload from a backend body.
pub fn unwrap_envelope(body: &[u8]) -> Result<Vec<u8>, ProxyError> {
    let mut envelope: Map<String, Value> =
        serde_json::from_slice(body).map_err(ProxyError::InvalidJson)?;
    let payload = envelope
        .remove(ENVELOPE_FIELD)
        .ok_or(ProxyError::MissingEnvelope)?;
    serde_json::to_vec(&payload).map_err(ProxyError::Serialize)
}

/// `200 OK` JSON response carrying an already-serialized payload.
pub fn json_response(payload: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
        .into_response()
}
