//! Basis reconciliation.
//!
//! Sifting uses only publicly announced settings (basis choices for BB84,
//! analyzer choices for E91), never the measured values themselves. Both
//! functions are pure and preserve the relative order of surviving positions.

use crate::basis::Basis;
use crate::errors::SessionError;

fn check_len(expected: usize, got: usize) -> Result<(), SessionError> {
    if got != expected {
        return Err(SessionError::LengthMismatch { expected, got });
    }
    Ok(())
}

/// BB84 sifting: Alice's bits at positions where both parties chose the same
/// basis, in ascending index order.
pub fn sift_key(
    alice_bases: &[Basis],
    bob_bases: &[Basis],
    alice_bits: &[bool],
) -> Result<Vec<bool>, SessionError> {
    check_len(alice_bases.len(), bob_bases.len())?;
    check_len(alice_bases.len(), alice_bits.len())?;

    Ok(alice_bases
        .iter()
        .zip(bob_bases.iter())
        .zip(alice_bits.iter())
        .filter(|((a, b), _)| a == b)
        .map(|(_, &bit)| bit)
        .collect())
}

/// The rounds selected for one E91 analyzer-setting pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSubset {
    /// Alice's outcomes at the selected rounds, in round order.
    pub alice_bits: Vec<bool>,
    /// Bob's outcomes at the selected rounds, in round order.
    pub bob_bits: Vec<bool>,
    /// The selected round indices, ascending.
    pub indices: Vec<usize>,
}

/// E91 subset selection: the rounds where Alice chose analyzer `pair.0` and
/// Bob chose analyzer `pair.1`.
///
/// The returned indices let the caller exclude these rounds from key material
/// once they have been consumed by the Bell test.
pub fn select_rounds(
    alice_bits: &[bool],
    bob_bits: &[bool],
    alice_choices: &[usize],
    bob_choices: &[usize],
    pair: (usize, usize),
) -> Result<RoundSubset, SessionError> {
    let n = alice_bits.len();
    check_len(n, bob_bits.len())?;
    check_len(n, alice_choices.len())?;
    check_len(n, bob_choices.len())?;

    let mut subset = RoundSubset {
        alice_bits: Vec::new(),
        bob_bits: Vec::new(),
        indices: Vec::new(),
    };
    for r in 0..n {
        if alice_choices[r] == pair.0 && bob_choices[r] == pair.1 {
            subset.alice_bits.push(alice_bits[r]);
            subset.bob_bits.push(bob_bits[r]);
            subset.indices.push(r);
        }
    }
    Ok(subset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::Basis::{Diagonal as X, Rectilinear as Z};

    #[test]
    fn test_sift_all_bases_matching_keeps_everything() {
        // "1010" with bases ZXZX on both sides
        let bits = vec![true, false, true, false];
        let bases = vec![Z, X, Z, X];
        let sifted = sift_key(&bases, &bases, &bits).unwrap();
        assert_eq!(sifted, bits);
    }

    #[test]
    fn test_sift_partial_match_keeps_matching_positions_in_order() {
        // Alice ZZXX, Bob ZXZX, bits 0110: positions 0 and 3 survive -> "00"
        let alice_bases = vec![Z, Z, X, X];
        let bob_bases = vec![Z, X, Z, X];
        let bits = vec![false, true, true, false];
        let sifted = sift_key(&alice_bases, &bob_bases, &bits).unwrap();
        assert_eq!(sifted, vec![false, false]);
    }

    #[test]
    fn test_sift_length_equals_matching_count() {
        let alice_bases = vec![Z, X, X, Z, X];
        let bob_bases = vec![X, X, Z, Z, X];
        let bits = vec![true; 5];
        let matching = alice_bases
            .iter()
            .zip(bob_bases.iter())
            .filter(|(a, b)| a == b)
            .count();
        let sifted = sift_key(&alice_bases, &bob_bases, &bits).unwrap();
        assert_eq!(sifted.len(), matching);
    }

    #[test]
    fn test_sift_no_match_is_empty_not_an_error() {
        let sifted = sift_key(&[Z, Z], &[X, X], &[true, false]).unwrap();
        assert!(sifted.is_empty());
    }

    #[test]
    fn test_sift_rejects_mismatched_lengths() {
        let result = sift_key(&[Z, X], &[Z], &[true, false]);
        assert_eq!(
            result,
            Err(SessionError::LengthMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_select_rounds_filters_on_both_choices() {
        let alice_bits = vec![true, false, true, false, true];
        let bob_bits = vec![false, false, true, true, true];
        let alice_choices = vec![0, 0, 2, 0, 2];
        let bob_choices = vec![0, 1, 0, 0, 0];

        let subset = select_rounds(&alice_bits, &bob_bits, &alice_choices, &bob_choices, (0, 0))
            .unwrap();
        assert_eq!(subset.indices, vec![0, 3]);
        assert_eq!(subset.alice_bits, vec![true, false]);
        assert_eq!(subset.bob_bits, vec![false, true]);

        let subset = select_rounds(&alice_bits, &bob_bits, &alice_choices, &bob_choices, (2, 0))
            .unwrap();
        assert_eq!(subset.indices, vec![2, 4]);
    }

    #[test]
    fn test_select_rounds_absent_pair_is_empty() {
        let subset = select_rounds(&[true], &[false], &[1], &[1], (0, 2)).unwrap();
        assert!(subset.indices.is_empty());
        assert!(subset.alice_bits.is_empty());
        assert!(subset.bob_bits.is_empty());
    }

    #[test]
    fn test_select_rounds_rejects_mismatched_lengths() {
        let result = select_rounds(&[true, false], &[true], &[0, 0], &[0, 0], (0, 0));
        assert!(matches!(result, Err(SessionError::LengthMismatch { .. })));
    }
}
