//! Server entity.
//!
//! # Responsibilities
//! - Represent a single backend server
//! - Track health verdict, exclusion deadline and last probe latency
//! - Answer eligibility questions from a consistent snapshot

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use url::Url;

use crate::health::state::Verdict;
use crate::load_balancer::pool::PoolError;

/// Mutable part of a server, guarded by one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSnapshot {
    /// Latest health verdict.
    pub healthy: bool,
    /// Server is withheld from selection until this instant.
    pub exclusion_deadline: Option<Instant>,
    /// Duration of the most recent probe.
    pub last_latency: Duration,
}

impl ServerSnapshot {
    /// Healthy and not under exclusion at `now`.
    pub fn is_eligible_at(&self, now: Instant) -> bool {
        self.healthy && self.exclusion_deadline.map_or(true, |deadline| deadline <= now)
    }
}

/// A single backend server.
#[derive(Debug)]
pub struct Server {
    /// Address exactly as configured.
    address: String,
    /// Parsed form of `address`, used to build outbound requests.
    url: Url,
    state: Mutex<ServerSnapshot>,
}

impl Server {
    /// Create a healthy server with no exclusion.
    pub fn new(address: impl Into<String>) -> Result<Self, PoolError> {
        Self::with_state(address, true, None)
    }

    /// Create a server in a given state.
    pub fn with_state(
        address: impl Into<String>,
        healthy: bool,
        exclusion_deadline: Option<Instant>,
    ) -> Result<Self, PoolError> {
        let address = address.into();
        let url = Url::parse(&address).map_err(|source| PoolError::InvalidAddress {
            address: address.clone(),
            source,
        })?;
        if url.scheme() != "http" {
            return Err(PoolError::UnsupportedScheme {
                address,
                scheme: url.scheme().to_string(),
            });
        }

        Ok(Self {
            address,
            url,
            state: Mutex::new(ServerSnapshot {
                healthy,
                exclusion_deadline,
                last_latency: Duration::ZERO,
            }),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    // A panic while holding the lock cannot leave the snapshot half-written,
    // so a poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, ServerSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ServerSnapshot {
        *self.lock()
    }

    pub fn is_healthy(&self) -> bool {
        self.lock().healthy
    }

    pub fn exclusion_deadline(&self) -> Option<Instant> {
        self.lock().exclusion_deadline
    }

    pub fn last_latency(&self) -> Duration {
        self.lock().last_latency
    }

    /// Return true if the server may receive traffic right now.
    pub fn is_eligible(&self) -> bool {
        self.is_eligible_at(Instant::now())
    }

    /// Return true if the server may receive traffic at `now`.
    pub fn is_eligible_at(&self, now: Instant) -> bool {
        self.lock().is_eligible_at(now)
    }

    // --- Health checker writes ---

    pub fn set_healthy(&self, healthy: bool) {
        self.lock().healthy = healthy;
    }

    pub fn set_exclusion_deadline(&self, deadline: Option<Instant>) {
        self.lock().exclusion_deadline = deadline;
    }

    /// Apply one health decision atomically.
    ///
    /// Down and Degraded set the exclusion deadline to `now + cooldown`.
    /// Healthy sets the flag but only clears a deadline that has passed.
    /// Returns the previous `healthy` flag so callers can log transitions.
    pub fn record_probe(
        &self,
        verdict: Verdict,
        latency: Duration,
        now: Instant,
        cooldown: Duration,
    ) -> bool {
        let mut state = self.lock();
        let was_healthy = state.healthy;
        match verdict {
            Verdict::Healthy => {
                state.healthy = true;
                // An unexpired cooldown still holds the server out.
                state.exclusion_deadline =
                    state.exclusion_deadline.filter(|deadline| *deadline > now);
            }
            Verdict::Degraded | Verdict::Down => {
                state.healthy = false;
                state.exclusion_deadline = Some(now + cooldown);
            }
        }
        state.last_latency = latency;
        was_healthy
    }
}
