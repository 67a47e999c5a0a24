//! Privacy amplification.
//!
//! An accepted raw key is collapsed through SHA-256 into a fixed-length
//! digest, destroying any partial information an eavesdropper may hold about
//! individual bits. The orchestrators only call this on the accept path.

use ring::digest::{digest, SHA256};

/// Pack a bit string into bytes, LSB first within each byte.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0, |acc, (i, &bit)| acc | ((bit as u8) << i))
        })
        .collect()
}

/// Hash a raw key down to a 256-bit secret, rendered as 64 hex characters.
///
/// Deterministic, defined for the empty key (hash of the empty input).
pub fn amplify(key: &[bool]) -> String {
    let bytes = bits_to_bytes(key);
    hex::encode(digest(&SHA256, &bytes).as_ref())
}
