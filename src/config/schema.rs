//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the balancer.
//! All types derive `Deserialize` and are read from TOML.

use std::time::Duration;

use serde::Deserialize;

use crate::config::duration::{deserialize_duration, deserialize_optional_duration};

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LbConfig {
    /// Backend addresses, in round-robin order.
    pub servers: Vec<String>,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable active health checks.
    pub enabled: bool,

    /// Time between two probes of the same server.
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,

    /// Upper bound on a single probe.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,

    /// Probes at or above this latency mark the server degraded.
    /// Falls back to `interval` when unset.
    #[serde(deserialize_with = "deserialize_optional_duration")]
    pub latency_threshold: Option<Duration>,

    /// How long a failed or degraded server stays excluded.
    #[serde(deserialize_with = "deserialize_duration")]
    pub exclusion_cooldown: Duration,
}

impl HealthCheckConfig {
    /// The latency threshold actually applied by the health checker.
    pub fn effective_latency_threshold(&self) -> Duration {
        self.latency_threshold.unwrap_or(self.interval)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(5),
            latency_threshold: None,
            exclusion_cooldown: Duration::ZERO,
        }
    }
}

/// Timeout configuration for outbound calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on one forwarded request, body included.
    #[serde(deserialize_with = "deserialize_duration")]
    pub backend_request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            backend_request: Duration::from_secs(30),
        }
    }
}

/// Size limits applied while buffering bodies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound or backend body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
