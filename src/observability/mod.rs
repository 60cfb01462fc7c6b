//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handler, health checkers:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID is attached to every handler log event
//! - Server address is attached to every health log event

pub mod logging;
pub mod metrics;
