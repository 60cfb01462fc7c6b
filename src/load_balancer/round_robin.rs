//! Round-robin load balancing strategy.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::time::Instant;

use crate::load_balancer::{server::Server, LoadBalancer};

/// Round-robin selector.
/// Stores a cursor that advances once per inspected candidate.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: Mutex<usize>,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server(&self, servers: &[Arc<Server>]) -> Option<Arc<Server>> {
        if servers.is_empty() {
            return None;
        }

        // The cursor lock is held across the whole scan: concurrent callers
        // must not interleave their position updates.
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let len = servers.len();

        for _ in 0..len {
            let index = *cursor % len;
            *cursor = cursor.wrapping_add(1);
            let server = &servers[index];
            if server.is_eligible_at(now) {
                return Some(server.clone());
            }
        }
        None
    }
}
