//! Configuration validation.
//!
//! Serde handles the syntactic layer; this pass checks values that parse
//! but cannot work. Every problem is reported, not just the first.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::schema::LbConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no backend servers configured")]
    NoServers,

    #[error("server #{index} \"{address}\" is not a valid http URL: {reason}")]
    InvalidServer {
        index: usize,
        address: String,
        reason: String,
    },

    #[error("invalid listener bind address \"{0}\"")]
    InvalidBindAddress(String),

    #[error("invalid metrics address \"{0}\"")]
    InvalidMetricsAddress(String),

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a parsed configuration.
pub fn validate_config(config: &LbConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.servers.is_empty() {
        errors.push(ValidationError::NoServers);
    }
    for (index, address) in config.servers.iter().enumerate() {
        if let Err(reason) = check_server_url(address) {
            errors.push(ValidationError::InvalidServer {
                index,
                address: address.clone(),
                reason,
            });
        }
        if config.servers[..index].contains(address) {
            tracing::warn!(
                address = %address,
                "Server listed more than once; it will get a larger share"
            );
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let durations = [
        ("health_check.interval", Some(config.health_check.interval)),
        ("health_check.timeout", Some(config.health_check.timeout)),
        (
            "health_check.latency_threshold",
            config.health_check.latency_threshold,
        ),
        ("timeouts.backend_request", Some(config.timeouts.backend_request)),
    ];
    for (field, value) in durations {
        if value == Some(Duration::ZERO) {
            errors.push(ValidationError::ZeroDuration { field });
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_server_url(address: &str) -> Result<(), String> {
    let url = Url::parse(address).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme \"{}\"", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
