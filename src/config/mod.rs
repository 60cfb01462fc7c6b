//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → duration.rs (human-readable durations)
//!     → validation.rs (semantic checks)
//!     → LbConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the server pool never changes afterwards
//! - All fields have defaults to allow minimal configs
//! - Any loading error is fatal before traffic is served

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    HealthCheckConfig, LbConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    TimeoutConfig,
};
