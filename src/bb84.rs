//! The BB84 prepare-and-measure session.
//!
//! Alice draws random bits and bases and encodes each bit in her basis; Bob
//! measures every qubit in his own random basis. After the quantum step both
//! parties announce bases, sift to the matching positions, and estimate the
//! error rate over the whole measurement batch. The sifted key is amplified
//! only when the QBER stays under the configured threshold.

use log::{debug, info};

use crate::basis::{format_bits, Basis};
use crate::channel::{NoiseConfig, QuantumChannel};
use crate::errors::SessionError;
use crate::estimator::{qber, qber_accepts, ErrorStatistic, DEFAULT_QBER_THRESHOLD};
use crate::privacy_amplification::amplify;
use crate::random::RandomSource;
use crate::session::{RejectReason, SessionResult};
use crate::sifting::sift_key;

/// Parameters of one BB84 session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bb84Config {
    /// Number of qubits per preparation.
    pub n: usize,
    /// Number of repeated measurements of the preparation.
    pub shots: usize,
    /// Channel noise.
    pub noise: NoiseConfig,
    /// Accept the key iff QBER stays strictly below this.
    pub qber_threshold: f64,
}

impl Default for Bb84Config {
    fn default() -> Self {
        Self {
            n: 29,
            shots: 1024,
            noise: NoiseConfig::noiseless(),
            qber_threshold: DEFAULT_QBER_THRESHOLD,
        }
    }
}

/// Everything a completed BB84 session produced, for diagnostics and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Bb84Run {
    pub alice_bits: Vec<bool>,
    pub alice_bases: Vec<Basis>,
    pub bob_bases: Vec<Basis>,
    /// Alice's bits at matching-basis positions, in order.
    pub sifted_key: Vec<bool>,
    /// Error rate over all shots at matching-basis positions.
    pub qber: f64,
    pub result: SessionResult,
}

/// Run one BB84 session to completion.
///
/// Generate → Measure → Sift → Estimate → Accept/Reject. A channel failure
/// surfaces as `Err(SessionError::Channel(..))`; a failed security test is the
/// `Insecure` result, not an error.
pub fn run_session<C: QuantumChannel>(
    config: &Bb84Config,
    channel: &mut C,
    source: &mut RandomSource,
) -> Result<Bb84Run, SessionError> {
    let alice_bits = source.random_bits(config.n);
    let alice_bases = source.random_bases(config.n);
    let bob_bases = source.random_bases(config.n);
    debug!(
        "bb84: n={} shots={} alice_bits={}",
        config.n,
        config.shots,
        format_bits(&alice_bits)
    );

    let batch = channel.prepare_and_measure(
        &alice_bits,
        &alice_bases,
        &bob_bases,
        config.shots,
        &config.noise,
    )?;

    let sifted_key = sift_key(&alice_bases, &bob_bases, &alice_bits)?;
    let measured_qber = qber(&alice_bits, &batch, &alice_bases, &bob_bases)?;
    info!(
        "bb84: sifted {} of {} bits, qber {:.4}",
        sifted_key.len(),
        config.n,
        measured_qber
    );

    let result = if qber_accepts(measured_qber, config.qber_threshold) {
        let digest = amplify(&sifted_key);
        info!("bb84: accepted, digest {}", digest);
        SessionResult::Secure {
            key: sifted_key.clone(),
            digest,
        }
    } else {
        info!(
            "bb84: rejected, qber {:.4} >= threshold {:.4}",
            measured_qber, config.qber_threshold
        );
        SessionResult::Insecure {
            reason: RejectReason::QberTooHigh,
            statistic: ErrorStatistic::Qber(measured_qber),
        }
    };

    Ok(Bb84Run {
        alice_bits,
        alice_bases,
        bob_bases,
        sifted_key,
        qber: measured_qber,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::LocalChannel;

    #[test]
    fn test_noiseless_session_accepts_with_zero_qber() {
        let config = Bb84Config {
            n: 64,
            shots: 32,
            ..Default::default()
        };
        let mut channel = LocalChannel::seed_from_u64(21);
        let mut source = RandomSource::seed_from_u64(22);

        let run = run_session(&config, &mut channel, &mut source).unwrap();
        assert_eq!(run.qber, 0.0);
        match run.result {
            SessionResult::Secure { ref key, ref digest } => {
                assert_eq!(*key, run.sifted_key);
                assert_eq!(digest.len(), 64);
            }
            ref other => panic!("expected Secure, got {:?}", other),
        }
    }

    #[test]
    fn test_heavy_noise_rejects_without_amplifying() {
        let config = Bb84Config {
            n: 256,
            shots: 8,
            noise: NoiseConfig::depolarizing(0.5),
            ..Default::default()
        };
        let mut channel = LocalChannel::seed_from_u64(23);
        let mut source = RandomSource::seed_from_u64(24);

        let run = run_session(&config, &mut channel, &mut source).unwrap();
        assert!(run.qber > DEFAULT_QBER_THRESHOLD);
        match run.result {
            SessionResult::Insecure { reason, ref statistic } => {
                assert_eq!(reason, RejectReason::QberTooHigh);
                assert_eq!(statistic.value(), run.qber);
            }
            ref other => panic!("expected Insecure, got {:?}", other),
        }
    }

    #[test]
    fn test_sifted_key_is_roughly_half_the_raw_length() {
        let config = Bb84Config {
            n: 2000,
            shots: 1,
            ..Default::default()
        };
        let mut channel = LocalChannel::seed_from_u64(25);
        let mut source = RandomSource::seed_from_u64(26);

        let run = run_session(&config, &mut channel, &mut source).unwrap();
        let fraction = run.sifted_key.len() as f64 / config.n as f64;
        assert!(
            (fraction - 0.5).abs() < 0.05,
            "sift fraction {} too far from 1/2",
            fraction
        );
    }

    #[test]
    fn test_same_seeds_reproduce_the_session() {
        let config = Bb84Config::default();
        let run_a = run_session(
            &config,
            &mut LocalChannel::seed_from_u64(1),
            &mut RandomSource::seed_from_u64(2),
        )
        .unwrap();
        let run_b = run_session(
            &config,
            &mut LocalChannel::seed_from_u64(1),
            &mut RandomSource::seed_from_u64(2),
        )
        .unwrap();
        assert_eq!(run_a, run_b);
    }
}
