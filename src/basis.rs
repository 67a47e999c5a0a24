//! Measurement bases and the fixed E91 analyzer angles.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;

use rand::Rng;

/// A BB84 measurement basis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Basis {
    /// Rectilinear (Z) basis: |0⟩ / |1⟩.
    Rectilinear,
    /// Diagonal (X) basis: |+⟩ / |−⟩.
    Diagonal,
}

impl Basis {
    /// Draw a basis uniformly at random.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            Basis::Diagonal
        } else {
            Basis::Rectilinear
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Rectilinear => write!(f, "Z"),
            Basis::Diagonal => write!(f, "X"),
        }
    }
}

/// Alice's three analyzer angles for E91 (radians).
pub const ALICE_ANGLES: [f64; 3] = [0.0, FRAC_PI_4, FRAC_PI_2];

/// Bob's three analyzer angles for E91 (radians).
///
/// Together with [`ALICE_ANGLES`] and the singlet correlation E = −cos(θa−θb),
/// the four CHSH setting pairs (A1,B1), (A1,B3), (A3,B1), (A3,B3) reach
/// S = −2√2, the quantum maximum. Bob's middle angle coincides with Alice's
/// first, so the remaining (non-CHSH) rounds carry strongly anticorrelated
/// outcomes suitable for key material.
pub const BOB_ANGLES: [f64; 3] = [FRAC_PI_4, 0.0, -FRAC_PI_4];

/// The four (Alice, Bob) angle-index pairs entering the CHSH statistic.
pub const CHSH_PAIRS: [(usize, usize); 4] = [(0, 0), (0, 2), (2, 0), (2, 2)];

/// Render a bit string as '0'/'1' characters, e.g. for log output.
pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}
