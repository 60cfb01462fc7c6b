//! Health decision policy.
//!
//! # Verdicts
//! ```text
//! probe failed (error, timeout, non-2xx) or zero latency → Down
//! probe ok, latency <  threshold                          → Healthy
//! probe ok, latency >= threshold                          → Degraded
//! ```
//!
//! Down and Degraded both clear `healthy` and set an exclusion deadline;
//! they differ only in how they are logged.

use std::fmt;
use std::time::Duration;

use axum::http::StatusCode;

/// What a single liveness probe observed.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The server answered with a status code.
    Responded(StatusCode),
    /// Connection or protocol error.
    Failed(String),
    /// No answer within the probe timeout.
    TimedOut,
}

/// Result of evaluating one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Healthy,
    Degraded,
    Down,
}

impl Verdict {
    pub fn is_healthy(self) -> bool {
        matches!(self, Verdict::Healthy)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Healthy => f.write_str("healthy"),
            Verdict::Degraded => f.write_str("degraded"),
            Verdict::Down => f.write_str("down"),
        }
    }
}

/// Turn a probe outcome and its measured latency into a verdict.
pub fn evaluate(outcome: &ProbeOutcome, latency: Duration, latency_threshold: Duration) -> Verdict {
    match outcome {
        ProbeOutcome::Responded(status) if status.is_success() => {
            if latency.is_zero() {
                Verdict::Down
            } else if latency < latency_threshold {
                Verdict::Healthy
            } else {
                Verdict::Degraded
            }
        }
        _ => Verdict::Down,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = Duration::from_secs(2);

    #[test]
    fn test_fast_success_is_healthy() {
        let outcome = ProbeOutcome::Responded(StatusCode::OK);
        assert_eq!(evaluate(&outcome, Duration::from_millis(20), THRESHOLD), Verdict::Healthy);

        let outcome = ProbeOutcome::Responded(StatusCode::NO_CONTENT);
        assert_eq!(evaluate(&outcome, Duration::from_millis(20), THRESHOLD), Verdict::Healthy);
    }

    #[test]
    fn test_slow_success_is_degraded() {
        let outcome = ProbeOutcome::Responded(StatusCode::OK);
        assert_eq!(evaluate(&outcome, THRESHOLD, THRESHOLD), Verdict::Degraded);
        assert_eq!(evaluate(&outcome, Duration::from_secs(5), THRESHOLD), Verdict::Degraded);
    }

    #[test]
    fn test_failures_are_down() {
        let latency = Duration::from_millis(5);
        assert_eq!(
            evaluate(&ProbeOutcome::Responded(StatusCode::INTERNAL_SERVER_ERROR), latency, THRESHOLD),
            Verdict::Down
        );
        assert_eq!(
            evaluate(&ProbeOutcome::Responded(StatusCode::NOT_FOUND), latency, THRESHOLD),
            Verdict::Down
        );
        assert_eq!(
            evaluate(&ProbeOutcome::Failed("connection refused".into()), latency, THRESHOLD),
            Verdict::Down
        );
        assert_eq!(evaluate(&ProbeOutcome::TimedOut, latency, THRESHOLD), Verdict::Down);
    }

    #[test]
    fn test_zero_latency_is_down() {
        let outcome = ProbeOutcome::Responded(StatusCode::OK);
        assert_eq!(evaluate(&outcome, Duration::ZERO, THRESHOLD), Verdict::Down);
    }
}
