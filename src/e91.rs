//! The E91 entanglement-based session.
//!
//! A source distributes one entangled pair per round; each party measures its
//! half at one of three analyzer angles chosen uniformly at random. After all
//! rounds, the four CHSH setting pairs are consumed by the Bell test and every
//! remaining round contributes Alice's outcome to the raw key. Only a CHSH
//! statistic beyond the classical bound (|S| > 2) certifies the session.
//!
//! Bob's outcomes at key rounds are correlated with Alice's through the
//! singlet statistics, not bit-identical; reconciling that residual noise is
//! out of scope here, so the raw key is taken from Alice's record.

use log::{debug, info};

use crate::basis::ALICE_ANGLES;
use crate::channel::QuantumChannel;
use crate::errors::SessionError;
use crate::estimator::{chsh, ChshOutcome, ErrorStatistic};
use crate::privacy_amplification::amplify;
use crate::random::RandomSource;
use crate::session::{RejectReason, SessionResult};

/// Parameters of one E91 session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct E91Config {
    /// Number of entangled pairs to distribute and measure.
    pub pairs: usize,
}

impl Default for E91Config {
    fn default() -> Self {
        Self { pairs: 1000 }
    }
}

/// Everything a completed E91 session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct E91Run {
    pub alice_bits: Vec<bool>,
    pub bob_bits: Vec<bool>,
    pub alice_choices: Vec<usize>,
    pub bob_choices: Vec<usize>,
    /// The Bell test record: S, the four correlations, the consumed rounds.
    pub chsh: ChshOutcome,
    /// Alice's bits at rounds not consumed by the Bell test.
    pub raw_key: Vec<bool>,
    pub result: SessionResult,
}

/// Run one E91 session to completion.
pub fn run_session<C: QuantumChannel>(
    config: &E91Config,
    channel: &mut C,
    source: &mut RandomSource,
) -> Result<E91Run, SessionError> {
    let alphabet = ALICE_ANGLES.len();
    let alice_choices = source.random_choices(config.pairs, alphabet)?;
    let bob_choices = source.random_choices(config.pairs, alphabet)?;

    let mut alice_bits = Vec::with_capacity(config.pairs);
    let mut bob_bits = Vec::with_capacity(config.pairs);
    for r in 0..config.pairs {
        let (a, b) = channel.entangled_measure(alice_choices[r], bob_choices[r])?;
        alice_bits.push(a);
        bob_bits.push(b);
    }
    debug!("e91: measured {} pairs", config.pairs);

    let outcome = chsh(&alice_bits, &bob_bits, &alice_choices, &bob_choices)?;
    info!(
        "e91: S = {:.4} from {} Bell-test rounds",
        outcome.s,
        outcome.chsh_indices.len()
    );

    // Key material: every round the Bell test did not consume.
    let mut in_chsh = vec![false; config.pairs];
    for &i in &outcome.chsh_indices {
        in_chsh[i] = true;
    }
    let raw_key: Vec<bool> = alice_bits
        .iter()
        .zip(in_chsh.iter())
        .filter(|(_, &used)| !used)
        .map(|(&bit, _)| bit)
        .collect();

    let result = if outcome.violates_classical_bound() {
        let digest = amplify(&raw_key);
        info!(
            "e91: accepted, {} key bits, digest {}",
            raw_key.len(),
            digest
        );
        SessionResult::Secure {
            key: raw_key.clone(),
            digest,
        }
    } else {
        info!("e91: rejected, |S| = {:.4} within classical bound", outcome.s.abs());
        SessionResult::Insecure {
            reason: RejectReason::BellTestFailed,
            statistic: ErrorStatistic::Chsh {
                s: outcome.s,
                correlations: outcome.correlations,
            },
        }
    };

    Ok(E91Run {
        alice_bits,
        bob_bits,
        alice_choices,
        bob_choices,
        chsh: outcome,
        raw_key,
        result,
    })
}
