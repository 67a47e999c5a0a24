//! Session outcomes.

use std::fmt;

use crate::estimator::ErrorStatistic;

/// Why a session refused to derive a key.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// BB84: the measured QBER reached the acceptance threshold.
    QberTooHigh,
    /// E91: |S| stayed within the classical bound, so the rounds carry no
    /// evidence of entanglement.
    BellTestFailed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::QberTooHigh => write!(f, "quantum bit error rate above threshold"),
            RejectReason::BellTestFailed => write!(f, "CHSH statistic within classical bound"),
        }
    }
}

/// The tagged outcome of a completed session.
///
/// A rejected session never carries key material: amplification is
/// short-circuited on the reject path, and the statistic is kept so the caller
/// can tell noise from eavesdropping-scale disturbance.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionResult {
    /// The security predicate held; the sifted key and its amplified digest.
    Secure {
        key: Vec<bool>,
        digest: String,
    },
    /// The security predicate failed.
    Insecure {
        reason: RejectReason,
        statistic: ErrorStatistic,
    },
}

impl SessionResult {
    /// Whether the session produced usable key material.
    pub fn is_secure(&self) -> bool {
        matches!(self, SessionResult::Secure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_secure() {
        let ok = SessionResult::Secure {
            key: vec![true],
            digest: "ab".repeat(32),
        };
        assert!(ok.is_secure());

        let rejected = SessionResult::Insecure {
            reason: RejectReason::QberTooHigh,
            statistic: ErrorStatistic::Qber(0.5),
        };
        assert!(!rejected.is_secure());
    }
}
