//! Quantum measurement backends behind the [`QuantumChannel`] trait.
//!
//! The protocol logic never simulates qubits itself; it hands an encoding and
//! measurement settings to a channel and gets outcome bits back. The trait can
//! be backed by a full state-vector simulator or real hardware. The backends
//! here are closed-form probabilistic models:
//!
//! - [`LocalChannel`] reproduces the quantum statistics exactly: matched-basis
//!   BB84 measurements return the encoded bit (up to depolarizing noise),
//!   mismatched bases return a uniform bit, and entangled pairs follow the
//!   singlet correlation E = −cos(θa − θb).
//! - [`ClassicalChannel`] is a local-hidden-variable model. Its entangled
//!   correlations are the sawtooth achievable classically, so any CHSH test
//!   against it stays at |S| ≤ 2.
//! - [`InterceptResend`] wraps another backend with an intercept-resend
//!   eavesdropper on the prepare-and-measure path.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::basis::{Basis, ALICE_ANGLES, BOB_ANGLES};
use crate::errors::ChannelError;

/// Noise applied by a channel while encoding qubits.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoiseConfig {
    /// Probability of a bit flip applied per encoding operation.
    pub depolarizing_rate: f64,
}

impl NoiseConfig {
    /// No noise at all.
    pub fn noiseless() -> Self {
        Self::default()
    }

    /// Depolarizing noise with the given per-qubit flip rate.
    pub fn depolarizing(rate: f64) -> Self {
        Self {
            depolarizing_rate: rate,
        }
    }

    fn flip_probability(&self) -> f64 {
        self.depolarizing_rate.clamp(0.0, 1.0)
    }
}

/// The boundary to the quantum subsystem.
///
/// Implementations must uphold two statistical contracts:
///
/// - `prepare_and_measure` returns `shots` independent outcome strings of the
///   same length as `bits`. Where `encode_bases[i] == measure_bases[i]` the
///   outcome equals `bits[i]` with probability `1 − depolarizing_rate`; where
///   the bases differ the outcome is uniform.
/// - `entangled_measure` returns one bit pair per call whose joint statistics
///   reproduce E = −cos(θa − θb) for the backend's analyzer angle tables, in
///   expectation over many calls.
pub trait QuantumChannel {
    /// Encode `bits` in `encode_bases`, measure in `measure_bases`, repeated
    /// over `shots` logically identical preparations.
    fn prepare_and_measure(
        &mut self,
        bits: &[bool],
        encode_bases: &[Basis],
        measure_bases: &[Basis],
        shots: usize,
        noise: &NoiseConfig,
    ) -> Result<Vec<Vec<bool>>, ChannelError>;

    /// Distribute one entangled pair and measure both halves at the analyzer
    /// angles selected by `alice_choice` and `bob_choice`.
    fn entangled_measure(
        &mut self,
        alice_choice: usize,
        bob_choice: usize,
    ) -> Result<(bool, bool), ChannelError>;
}

fn check_lengths(bits: &[bool], encode: &[Basis], measure: &[Basis]) -> Result<(), ChannelError> {
    if encode.len() != bits.len() || measure.len() != bits.len() {
        return Err(ChannelError::Backend(format!(
            "encoding of length {} measured with basis sequences of lengths {} and {}",
            bits.len(),
            encode.len(),
            measure.len()
        )));
    }
    Ok(())
}

fn check_setting(index: usize, alphabet: usize) -> Result<(), ChannelError> {
    if index >= alphabet {
        return Err(ChannelError::InvalidSetting { index, alphabet });
    }
    Ok(())
}

/// One measured string: matched bases reproduce the encoded bit up to noise,
/// mismatched bases are indeterminate.
fn measure_once<R: Rng>(
    rng: &mut R,
    bits: &[bool],
    encode_bases: &[Basis],
    measure_bases: &[Basis],
    flip_probability: f64,
) -> Vec<bool> {
    bits.iter()
        .zip(encode_bases.iter().zip(measure_bases.iter()))
        .map(|(&bit, (enc, meas))| {
            if enc == meas {
                if rng.gen::<f64>() < flip_probability {
                    !bit
                } else {
                    bit
                }
            } else {
                rng.gen()
            }
        })
        .collect()
}

/// Closed-form quantum backend.
#[derive(Debug, Clone)]
pub struct LocalChannel {
    rng: StdRng,
    alice_angles: [f64; 3],
    bob_angles: [f64; 3],
}

impl LocalChannel {
    /// Backend seeded from OS entropy, using the reference analyzer angles.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible backend for tests and demos.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            alice_angles: ALICE_ANGLES,
            bob_angles: BOB_ANGLES,
        }
    }
}

impl Default for LocalChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumChannel for LocalChannel {
    fn prepare_and_measure(
        &mut self,
        bits: &[bool],
        encode_bases: &[Basis],
        measure_bases: &[Basis],
        shots: usize,
        noise: &NoiseConfig,
    ) -> Result<Vec<Vec<bool>>, ChannelError> {
        check_lengths(bits, encode_bases, measure_bases)?;
        let flip = noise.flip_probability();
        Ok((0..shots)
            .map(|_| measure_once(&mut self.rng, bits, encode_bases, measure_bases, flip))
            .collect())
    }

    fn entangled_measure(
        &mut self,
        alice_choice: usize,
        bob_choice: usize,
    ) -> Result<(bool, bool), ChannelError> {
        check_setting(alice_choice, self.alice_angles.len())?;
        check_setting(bob_choice, self.bob_angles.len())?;

        let delta = self.alice_angles[alice_choice] - self.bob_angles[bob_choice];
        // Singlet statistics: with bits mapped 0 → +1 and 1 → −1,
        // E = P(equal) − P(unequal) = −cos Δ, so P(equal) = (1 − cos Δ)/2.
        let p_equal = (1.0 - delta.cos()) / 2.0;
        let alice_bit: bool = self.rng.gen();
        let bob_bit = if self.rng.gen::<f64>() < p_equal {
            alice_bit
        } else {
            !alice_bit
        };
        Ok((alice_bit, bob_bit))
    }
}

/// Local-hidden-variable backend.
///
/// Each pair carries a hidden polarization λ drawn uniformly on [0, 2π); both
/// outcomes are deterministic functions of λ and the local analyzer angle.
/// This is the textbook classical strategy: its correlations are piecewise
/// linear in Δ and the CHSH statistic never exceeds 2 in magnitude. Detectors
/// additionally misfire with probability [`Self::MISFIRE_RATE`], which keeps a
/// sampled S strictly inside the classical region instead of on its boundary
/// (the sawtooth saturates |S| = 2 exactly at the reference angles).
#[derive(Debug, Clone)]
pub struct ClassicalChannel {
    rng: StdRng,
    alice_angles: [f64; 3],
    bob_angles: [f64; 3],
}

impl ClassicalChannel {
    /// Per-detector misfire probability.
    pub const MISFIRE_RATE: f64 = 0.05;

    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seed_from_u64(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            alice_angles: ALICE_ANGLES,
            bob_angles: BOB_ANGLES,
        }
    }
}

impl Default for ClassicalChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumChannel for ClassicalChannel {
    fn prepare_and_measure(
        &mut self,
        bits: &[bool],
        encode_bases: &[Basis],
        measure_bases: &[Basis],
        shots: usize,
        noise: &NoiseConfig,
    ) -> Result<Vec<Vec<bool>>, ChannelError> {
        // The prepare-and-measure contract is classically simulable, so this
        // backend satisfies it the same way LocalChannel does.
        check_lengths(bits, encode_bases, measure_bases)?;
        let flip = noise.flip_probability();
        Ok((0..shots)
            .map(|_| measure_once(&mut self.rng, bits, encode_bases, measure_bases, flip))
            .collect())
    }

    fn entangled_measure(
        &mut self,
        alice_choice: usize,
        bob_choice: usize,
    ) -> Result<(bool, bool), ChannelError> {
        check_setting(alice_choice, self.alice_angles.len())?;
        check_setting(bob_choice, self.bob_angles.len())?;

        let lambda = self.rng.gen::<f64>() * std::f64::consts::TAU;
        // Detector fires "+" when the analyzer is within a quarter turn of the
        // hidden polarization; Bob's detector is anticorrelated with Alice's.
        let mut alice_plus = (self.alice_angles[alice_choice] - lambda).cos() >= 0.0;
        let mut bob_plus = (self.bob_angles[bob_choice] - lambda).cos() < 0.0;
        if self.rng.gen::<f64>() < Self::MISFIRE_RATE {
            alice_plus = !alice_plus;
        }
        if self.rng.gen::<f64>() < Self::MISFIRE_RATE {
            bob_plus = !bob_plus;
        }
        // "+" outcome is bit 0
        Ok((!alice_plus, !bob_plus))
    }
}

/// Intercept-resend eavesdropper wrapped around another backend.
///
/// With probability `eve_ratio` per qubit, Eve measures the flying qubit in a
/// random basis and resends what she saw. At intercepted positions the
/// encoding reaching the inner channel becomes Eve's basis and bit, which
/// raises the sifted error rate toward 25% at `eve_ratio` = 1.
#[derive(Debug, Clone)]
pub struct InterceptResend<C> {
    inner: C,
    eve_ratio: f64,
    rng: StdRng,
}

impl<C: QuantumChannel> InterceptResend<C> {
    pub fn new(inner: C, eve_ratio: f64) -> Self {
        Self {
            inner,
            eve_ratio,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seed_from_u64(inner: C, eve_ratio: f64, seed: u64) -> Self {
        Self {
            inner,
            eve_ratio,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<C: QuantumChannel> QuantumChannel for InterceptResend<C> {
    fn prepare_and_measure(
        &mut self,
        bits: &[bool],
        encode_bases: &[Basis],
        measure_bases: &[Basis],
        shots: usize,
        noise: &NoiseConfig,
    ) -> Result<Vec<Vec<bool>>, ChannelError> {
        check_lengths(bits, encode_bases, measure_bases)?;

        let ratio = self.eve_ratio.clamp(0.0, 1.0);
        let mut resent_bits = bits.to_vec();
        let mut resent_bases = encode_bases.to_vec();

        for i in 0..bits.len() {
            if self.rng.gen::<f64>() >= ratio {
                continue;
            }
            let eve_basis = Basis::random(&mut self.rng);
            // Matched basis: Eve reads the bit Alice sent. Mismatched: her
            // outcome is indeterminate, and the resent qubit carries it.
            let eve_bit = if eve_basis == encode_bases[i] {
                bits[i]
            } else {
                self.rng.gen()
            };
            resent_bits[i] = eve_bit;
            resent_bases[i] = eve_basis;
        }

        self.inner
            .prepare_and_measure(&resent_bits, &resent_bases, measure_bases, shots, noise)
    }

    fn entangled_measure(
        &mut self,
        alice_choice: usize,
        bob_choice: usize,
    ) -> Result<(bool, bool), ChannelError> {
        // This wrapper models a tap on the prepare-and-measure fiber only.
        self.inner.entangled_measure(alice_choice, bob_choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matched_bases_reproduce_bits_without_noise() {
        let mut channel = LocalChannel::seed_from_u64(7);
        let bits = vec![true, false, true, false];
        let bases = vec![Basis::Rectilinear, Basis::Diagonal, Basis::Rectilinear, Basis::Diagonal];
        let batch = channel
            .prepare_and_measure(&bits, &bases, &bases, 16, &NoiseConfig::noiseless())
            .unwrap();
        assert_eq!(batch.len(), 16);
        for shot in batch {
            assert_eq!(shot, bits);
        }
    }

    #[test]
    fn test_mismatched_bases_are_indeterminate() {
        let mut channel = LocalChannel::seed_from_u64(8);
        let n = 2000;
        let bits = vec![false; n];
        let encode = vec![Basis::Rectilinear; n];
        let measure = vec![Basis::Diagonal; n];
        let batch = channel
            .prepare_and_measure(&bits, &encode, &measure, 1, &NoiseConfig::noiseless())
            .unwrap();
        let ones = batch[0].iter().filter(|&&b| b).count();
        let ratio = ones as f64 / n as f64;
        assert!(
            (ratio - 0.5).abs() < 0.05,
            "mismatched-basis outcomes should be uniform, got ratio {}",
            ratio
        );
    }

    #[test]
    fn test_depolarizing_noise_flips_at_the_configured_rate() {
        let mut channel = LocalChannel::seed_from_u64(9);
        let n = 4000;
        let bits = vec![false; n];
        let bases = vec![Basis::Rectilinear; n];
        let batch = channel
            .prepare_and_measure(&bits, &bases, &bases, 1, &NoiseConfig::depolarizing(0.3))
            .unwrap();
        let flipped = batch[0].iter().filter(|&&b| b).count();
        let ratio = flipped as f64 / n as f64;
        assert!(
            (ratio - 0.3).abs() < 0.04,
            "flip rate {} too far from configured 0.3",
            ratio
        );
    }

    #[test]
    fn test_entangled_correlation_tracks_minus_cosine() {
        let mut channel = LocalChannel::seed_from_u64(10);
        // Settings (A1, B2) have equal angles: E = -cos(0) = -1, so the
        // outcome bits must always differ.
        for _ in 0..200 {
            let (a, b) = channel.entangled_measure(0, 1).unwrap();
            assert_ne!(a, b, "perfectly anticorrelated setting produced equal bits");
        }
    }

    #[test]
    fn test_out_of_range_setting_is_rejected() {
        let mut channel = LocalChannel::seed_from_u64(11);
        let err = channel.entangled_measure(3, 0).unwrap_err();
        assert_eq!(
            err,
            ChannelError::InvalidSetting {
                index: 3,
                alphabet: 3
            }
        );
    }

    #[test]
    fn test_length_mismatch_is_a_backend_error() {
        let mut channel = LocalChannel::seed_from_u64(12);
        let result = channel.prepare_and_measure(
            &[true, false],
            &[Basis::Rectilinear],
            &[Basis::Rectilinear, Basis::Diagonal],
            1,
            &NoiseConfig::noiseless(),
        );
        assert!(matches!(result, Err(ChannelError::Backend(_))));
    }

    #[test]
    fn test_intercept_resend_disturbs_matched_bases() {
        let inner = LocalChannel::seed_from_u64(13);
        let mut tapped = InterceptResend::seed_from_u64(inner, 1.0, 14);
        let n = 4000;
        let bits = vec![false; n];
        let bases = vec![Basis::Rectilinear; n];
        let batch = tapped
            .prepare_and_measure(&bits, &bases, &bases, 1, &NoiseConfig::noiseless())
            .unwrap();
        let errors = batch[0].iter().filter(|&&b| b).count();
        let ratio = errors as f64 / n as f64;
        // Full interception induces 25% errors at matched bases
        assert!(
            (ratio - 0.25).abs() < 0.04,
            "intercept-resend error rate {} too far from 0.25",
            ratio
        );
    }
}
