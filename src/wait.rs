//! Bounded-wait primitives.
//!
//! Every expectation in the suite polls the page until its condition holds
//! or a timeout elapses; there is no retry beyond that, and a timed-out
//! wait is reported the same way as a literal mismatch: as a failed
//! expectation carrying what was expected and what was last observed.

use std::time::Duration;

use thiserror::Error;

/// Tuning for a polling expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    /// Give up after this long.
    pub timeout: Duration,
    /// Pause between probes.
    pub interval: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        WaitSettings {
            timeout: Duration::from_millis(4_000),
            interval: Duration::from_millis(100),
        }
    }
}

/// Outcome of a single expectation probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The condition holds; the expectation passes.
    Satisfied,
    /// Not yet; carries a snapshot of what was observed instead.
    Pending(String),
}

impl Probe {
    /// Convenience for probes whose observation is a plain yes/no.
    pub fn from_bool(satisfied: bool, observed: impl Into<String>) -> Self {
        if satisfied {
            Probe::Satisfied
        } else {
            Probe::Pending(observed.into())
        }
    }
}

/// A bounded wait that never saw its condition hold.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected {expected} within {timeout_ms}ms; last observed: {observed}")]
pub struct WaitTimeout {
    pub expected: String,
    pub observed: String,
    pub timeout_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_from_bool_keeps_the_observation_only_when_pending() {
        assert_eq!(Probe::from_bool(true, "ignored"), Probe::Satisfied);
        assert_eq!(
            Probe::from_bool(false, "still hidden"),
            Probe::Pending("still hidden".to_string())
        );
    }

    #[test]
    fn timeout_message_names_expectation_and_observation() {
        let err = WaitTimeout {
            expected: "element '#checkout' is visible".to_string(),
            observed: "element absent".to_string(),
            timeout_ms: 4_000,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("element '#checkout' is visible"));
        assert!(rendered.contains("4000ms"));
        assert!(rendered.contains("element absent"));
    }
}
