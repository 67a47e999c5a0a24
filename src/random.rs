//! Classical randomness for protocol sessions.
//!
//! All protocol randomness flows through an explicit [`RandomSource`] owned by
//! the caller and passed `&mut` into a session, so a fixed seed reproduces an
//! entire run. Nothing here touches global RNG state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::basis::Basis;
use crate::errors::SessionError;

/// Seedable source of uniform bits, bases, and analyzer choices.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Seed from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed seed for reproducible sessions.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `n` independent unbiased bits.
    pub fn random_bits(&mut self, n: usize) -> Vec<bool> {
        (0..n).map(|_| self.rng.gen()).collect()
    }

    /// `n` independent uniform BB84 basis choices.
    pub fn random_bases(&mut self, n: usize) -> Vec<Basis> {
        (0..n).map(|_| Basis::random(&mut self.rng)).collect()
    }

    /// `n` independent uniform draws from `0..alphabet`.
    pub fn random_choices(
        &mut self,
        n: usize,
        alphabet: usize,
    ) -> Result<Vec<usize>, SessionError> {
        if alphabet == 0 {
            return Err(SessionError::EmptyAlphabet);
        }
        Ok((0..n).map(|_| self.rng.gen_range(0..alphabet)).collect())
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}
