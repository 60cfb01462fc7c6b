//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     One interval timer per server
//!     → HEAD probe with timeout, latency measured
//!     → state.rs turns the outcome into a verdict
//!     → Server::record_probe applies it under the server's lock
//! ```
//!
//! # Design Decisions
//! - One independent task per server; a slow server never delays the others
//! - The server lock is never held across probe I/O
//! - Probe failures only affect the probed server, never the process
//! - Tasks stop on the shared shutdown broadcast

pub mod active;
pub mod state;

pub use active::{HealthChecker, HealthMonitor};
pub use state::{evaluate, ProbeOutcome, Verdict};
