//! Error-rate estimation and the security predicates.
//!
//! BB84 sessions are judged by the quantum bit error rate over all shots at
//! matching-basis positions; E91 sessions by the CHSH statistic S computed
//! from four fixed analyzer-setting pairs. In both cases an empty denominator
//! is a defined neutral value, not an error: QBER falls back to 0.0, an
//! undefined correlation is `None` and enters S as 0.0, so missing data can
//! only fail the Bell test, never fake a violation.

use crate::basis::{Basis, CHSH_PAIRS};
use crate::errors::SessionError;
use crate::sifting::select_rounds;

/// Reference QBER acceptance threshold.
pub const DEFAULT_QBER_THRESHOLD: f64 = 0.2;

/// Largest |S| reachable by any local-hidden-variable model.
pub const CHSH_CLASSICAL_BOUND: f64 = 2.0;

/// The statistic a session was judged by, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorStatistic {
    /// BB84: fraction of mismatched bits at matching-basis positions.
    Qber(f64),
    /// E91: the CHSH statistic and its four constituent correlations
    /// (`None` where a setting pair collected no rounds).
    Chsh {
        s: f64,
        correlations: [Option<f64>; 4],
    },
}

impl ErrorStatistic {
    /// The scalar a caller would plot or log: QBER itself, or S.
    pub fn value(&self) -> f64 {
        match *self {
            ErrorStatistic::Qber(q) => q,
            ErrorStatistic::Chsh { s, .. } => s,
        }
    }
}

fn check_len(expected: usize, got: usize) -> Result<(), SessionError> {
    if got != expected {
        return Err(SessionError::LengthMismatch { expected, got });
    }
    Ok(())
}

/// Quantum bit error rate over a measurement batch.
///
/// For every shot and every position where the two basis sequences agree,
/// Alice's bit is compared against bit i of that shot's measured string (one
/// index per bit per shot). Returns mismatches/matches, or 0.0 when no
/// position has matching bases.
pub fn qber(
    alice_bits: &[bool],
    batch: &[Vec<bool>],
    alice_bases: &[Basis],
    bob_bases: &[Basis],
) -> Result<f64, SessionError> {
    let n = alice_bits.len();
    check_len(n, alice_bases.len())?;
    check_len(n, bob_bases.len())?;
    for shot in batch {
        check_len(n, shot.len())?;
    }

    let mut matches = 0u64;
    let mut mismatches = 0u64;
    for shot in batch {
        for i in 0..n {
            if alice_bases[i] == bob_bases[i] {
                matches += 1;
                if alice_bits[i] != shot[i] {
                    mismatches += 1;
                }
            }
        }
    }

    if matches == 0 {
        return Ok(0.0);
    }
    Ok(mismatches as f64 / matches as f64)
}

/// Whether a measured QBER permits using the sifted key.
pub fn qber_accepts(qber: f64, threshold: f64) -> bool {
    qber < threshold
}

/// Correlation of two outcome sequences after mapping bit 0 → +1, 1 → −1.
///
/// `None` when the sequences are empty, since an absent correlation is not the
/// same as a zero one.
pub fn correlation(a_bits: &[bool], b_bits: &[bool]) -> Result<Option<f64>, SessionError> {
    check_len(a_bits.len(), b_bits.len())?;
    if a_bits.is_empty() {
        return Ok(None);
    }

    let sum: f64 = a_bits
        .iter()
        .zip(b_bits.iter())
        .map(|(&a, &b)| if a == b { 1.0 } else { -1.0 })
        .sum();
    Ok(Some(sum / a_bits.len() as f64))
}

/// The CHSH statistic of an E91 round record.
#[derive(Debug, Clone, PartialEq)]
pub struct ChshOutcome {
    /// S = E(A1,B1) + E(A1,B3) + E(A3,B1) − E(A3,B3).
    pub s: f64,
    /// The four correlations, in [`CHSH_PAIRS`] order.
    pub correlations: [Option<f64>; 4],
    /// All round indices consumed by the Bell test, ascending.
    pub chsh_indices: Vec<usize>,
}

impl ChshOutcome {
    /// Whether the statistic violates the classical bound.
    pub fn violates_classical_bound(&self) -> bool {
        self.s.abs() > CHSH_CLASSICAL_BOUND
    }
}

/// Compute S over the four fixed setting pairs.
///
/// An undefined correlation contributes 0.0 to S and stays `None` in the
/// outcome record.
pub fn chsh(
    alice_bits: &[bool],
    bob_bits: &[bool],
    alice_choices: &[usize],
    bob_choices: &[usize],
) -> Result<ChshOutcome, SessionError> {
    let mut correlations = [None; 4];
    let mut chsh_indices = Vec::new();

    for (k, &pair) in CHSH_PAIRS.iter().enumerate() {
        let subset = select_rounds(alice_bits, bob_bits, alice_choices, bob_choices, pair)?;
        correlations[k] = correlation(&subset.alice_bits, &subset.bob_bits)?;
        chsh_indices.extend(subset.indices);
    }
    chsh_indices.sort_unstable();

    let e = |k: usize| correlations[k].unwrap_or(0.0);
    let s = e(0) + e(1) + e(2) - e(3);

    Ok(ChshOutcome {
        s,
        correlations,
        chsh_indices,
    })
}
