//! Server pool management.
//!
//! # Responsibilities
//! - Hold the ordered, fixed list of servers
//! - Apply the load balancing algorithm to select a server

use std::sync::Arc;

use thiserror::Error;

use crate::load_balancer::{round_robin::RoundRobin, server::Server, LoadBalancer};

/// Error raised while building a pool from configured addresses.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("invalid server address \"{address}\": {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    #[error("server address \"{address}\" uses unsupported scheme \"{scheme}\"")]
    UnsupportedScheme { address: String, scheme: String },
}

/// Ordered servers plus the policy that picks among them.
#[derive(Debug)]
pub struct ServerPool {
    servers: Vec<Arc<Server>>,
    balancer: Box<dyn LoadBalancer>,
}

impl ServerPool {
    /// Create a pool from existing servers and a selection policy.
    pub fn new(servers: Vec<Arc<Server>>, balancer: Box<dyn LoadBalancer>) -> Self {
        Self { servers, balancer }
    }

    /// Create a round-robin pool from configured addresses, preserving order.
    pub fn from_addresses(addresses: &[String]) -> Result<Self, PoolError> {
        let servers = addresses
            .iter()
            .map(|address| Server::new(address.as_str()).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(servers, Box::new(RoundRobin::new())))
    }

    /// Select the next eligible server, or None when nothing can serve.
    pub fn select(&self) -> Option<Arc<Server>> {
        let selected = self.balancer.next_server(&self.servers);
        if selected.is_none() {
            tracing::debug!(server_count = self.servers.len(), "No eligible servers in pool");
            for server in &self.servers {
                tracing::debug!(address = %server.address(), state = ?server.snapshot(), "Server status");
            }
        }
        selected
    }

    /// All servers in traversal order (for health checking).
    pub fn servers(&self) -> &[Arc<Server>] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
