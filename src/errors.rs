//! Error taxonomy for protocol sessions.
//!
//! Only two kinds of condition are `Err` here: malformed input (length
//! mismatches, an empty choice alphabet) and failures of the quantum channel
//! backend. A statistic with an empty denominator and a failed security test
//! are ordinary data; see [`crate::estimator`] and
//! [`crate::session::SessionResult`].

use std::time::Duration;

use thiserror::Error;

/// Failure inside a [`crate::channel::QuantumChannel`] backend.
///
/// These reflect infrastructure problems (a dead simulator, a slow device),
/// not eavesdropping or noise, and are kept distinct from a security
/// rejection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChannelError {
    #[error("channel backend failure: {0}")]
    Backend(String),

    #[error("channel timed out after {0:?}")]
    Timeout(Duration),

    #[error("analyzer setting {index} out of range (alphabet size {alphabet})")]
    InvalidSetting { index: usize, alphabet: usize },
}

/// Failure of a protocol session as a whole.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("sequence length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("choice alphabet must not be empty")]
    EmptyAlphabet,

    #[error("quantum channel failure: {0}")]
    Channel(#[from] ChannelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_converts_to_session_error() {
        let err: SessionError = ChannelError::Backend("simulator died".into()).into();
        assert!(matches!(err, SessionError::Channel(_)));
    }

    #[test]
    fn test_error_messages_name_the_condition() {
        let err = SessionError::LengthMismatch {
            expected: 4,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "sequence length mismatch: expected 4, got 3"
        );
    }
}
