//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → pool.rs (ordered, fixed server list)
//!     → round_robin.rs (rotate through eligible servers)
//!     → server.rs (eligibility from health + exclusion deadline)
//!     → Return server or None (no capacity)
//! ```
//!
//! # Design Decisions
//! - Pool membership is fixed at startup
//! - Health checker is the only writer of server state
//! - Ineligible servers are skipped, never waited on

use std::sync::Arc;

pub mod pool;
pub mod round_robin;
pub mod server;

pub use pool::{PoolError, ServerPool};
pub use round_robin::RoundRobin;
pub use server::{Server, ServerSnapshot};

/// Selection policy over an ordered server list.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Pick the next server to receive a request, or None if none is eligible.
    fn next_server(&self, servers: &[Arc<Server>]) -> Option<Arc<Server>>;
}
