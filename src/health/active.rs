//! Active health checking.
//!
//! # Responsibilities
//! - Run one probe loop per server
//! - Update server health state based on results
//! - Stop every loop when shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::HealthCheckConfig;
use crate::health::state::{evaluate, ProbeOutcome, Verdict};
use crate::load_balancer::{Server, ServerPool};
use crate::observability::metrics;

/// User agent sent with every probe.
pub const PROBE_USER_AGENT: &str = "rr-proxy-health-check";

type ProbeClient = Client<HttpConnector, Body>;

/// Probe loop for a single server.
pub struct HealthChecker {
    server: Arc<Server>,
    client: ProbeClient,
    interval: Duration,
    timeout: Duration,
    latency_threshold: Duration,
    exclusion_cooldown: Duration,
}

impl HealthChecker {
    pub fn new(server: Arc<Server>, client: ProbeClient, config: &HealthCheckConfig) -> Self {
        Self {
            server,
            client,
            interval: config.interval,
            timeout: config.timeout,
            latency_threshold: config.effective_latency_threshold(),
            exclusion_cooldown: config.exclusion_cooldown,
        }
    }

    /// Probe on every tick until shutdown is received.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::debug!(address = %self.server.address(), "Health checker stopping");
                    break;
                }
            }
        }
    }

    /// Probe once, record the verdict on the server, and return it.
    pub async fn check_once(&self) -> Verdict {
        let (outcome, latency) = self.probe().await;
        let verdict = evaluate(&outcome, latency, self.latency_threshold);
        let address = self.server.address();

        match (&outcome, verdict) {
            (ProbeOutcome::Failed(error), _) => {
                tracing::warn!(address = %address, error = %error, "Health check failed: connection error");
            }
            (ProbeOutcome::TimedOut, _) => {
                tracing::warn!(address = %address, timeout = ?self.timeout, "Health check failed: timeout");
            }
            (ProbeOutcome::Responded(status), Verdict::Down) => {
                tracing::warn!(address = %address, status = %status, latency = ?latency, "Server is down");
            }
            (ProbeOutcome::Responded(_), Verdict::Degraded) => {
                tracing::warn!(
                    address = %address,
                    latency = ?latency,
                    threshold = ?self.latency_threshold,
                    "Server is degraded: latency over threshold"
                );
            }
            (ProbeOutcome::Responded(_), Verdict::Healthy) => {}
        }

        // Lock is taken only here, after the probe I/O has finished.
        let was_healthy =
            self.server
                .record_probe(verdict, latency, Instant::now(), self.exclusion_cooldown);

        if was_healthy != verdict.is_healthy() {
            tracing::info!(
                address = %address,
                verdict = %verdict,
                latency = ?latency,
                "Server health changed"
            );
        }

        metrics::record_backend_health(address, verdict.is_healthy());
        metrics::record_probe_latency(address, latency);
        verdict
    }

    async fn probe(&self) -> (ProbeOutcome, Duration) {
        let start = Instant::now();

        let uri = match self.server.url().as_str().parse::<Uri>() {
            Ok(uri) => uri,
            Err(e) => return (ProbeOutcome::Failed(e.to_string()), start.elapsed()),
        };
        let request = match Request::builder()
            .method(Method::HEAD)
            .uri(uri)
            .header(header::USER_AGENT, PROBE_USER_AGENT)
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(e) => return (ProbeOutcome::Failed(e.to_string()), start.elapsed()),
        };

        let outcome = match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => ProbeOutcome::Responded(response.status()),
            Ok(Err(e)) => ProbeOutcome::Failed(e.to_string()),
            Err(_) => ProbeOutcome::TimedOut,
        };
        (outcome, start.elapsed())
    }
}

/// Owns the per-server probe tasks.
pub struct HealthMonitor {
    tasks: Vec<JoinHandle<()>>,
}

impl HealthMonitor {
    /// Spawn one health checker per server in the pool.
    ///
    /// Every task gets its own subscription derived from `shutdown`.
    pub fn spawn(
        pool: &ServerPool,
        config: &HealthCheckConfig,
        shutdown: &broadcast::Receiver<()>,
    ) -> Self {
        if !config.enabled {
            tracing::info!("Active health checks disabled");
            return Self { tasks: Vec::new() };
        }

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        tracing::info!(
            servers = pool.len(),
            interval = ?config.interval,
            latency_threshold = ?config.effective_latency_threshold(),
            "Health monitor starting"
        );

        let tasks = pool
            .servers()
            .iter()
            .map(|server| {
                let checker = HealthChecker::new(server.clone(), client.clone(), config);
                tokio::spawn(checker.run(shutdown.resubscribe()))
            })
            .collect();

        Self { tasks }
    }

    /// Number of probe tasks started.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Stop every probe task without waiting for shutdown.
    pub fn abort(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }

    /// Wait for every probe task to finish.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                if e.is_cancelled() {
                    continue;
                }
                tracing::error!(error = %e, "Health checker task failed");
            }
        }
        tracing::info!("Health monitor stopped");
    }
}
