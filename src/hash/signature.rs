//! Packed sign signatures and Hamming distance.
//!
//! ## Layout
//!
//! A signature of `b` bits occupies `b / 64` words. Bit `i` lives in word
//! `i / 64` at bit position `i % 64`, and is 1 iff projection coordinate `i`
//! is `>= 0`.
//!
//! ## Hamming to angle
//!
//! For Gaussian random hyperplanes (Charikar 2002),
//!
//! ```text
//! P[sign(r·a) != sign(r·b)] = θ(a,b) / π
//! ```
//!
//! so `hamming / bits` estimates `θ / π` and `cos(π · hamming / bits)`
//! estimates the cosine similarity.

use std::f64::consts::PI;

/// Bits per signature word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Number of words needed for `bits` bits.
#[inline]
#[must_use]
pub fn words_for_bits(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

/// Pack the signs of `projection` into `out`.
///
/// `out` must hold `words_for_bits(projection.len())` words.
pub fn pack_signs(projection: &[f64], out: &mut [u64]) {
    debug_assert_eq!(out.len(), words_for_bits(projection.len()));
    out.fill(0);
    for (i, &value) in projection.iter().enumerate() {
        if value >= 0.0 {
            out[i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
        }
    }
}

/// Number of differing bits between two equal-length signatures.
#[inline]
#[must_use]
pub fn hamming(a: &[u64], b: &[u64]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// Estimated cosine similarity for a Hamming distance over `bits` bits.
#[inline]
#[must_use]
pub fn hamming_to_cosine(hamming: u32, bits: usize) -> f64 {
    (PI * f64::from(hamming) / bits as f64).cos()
}

/// Slack absorbing `acos` rounding before flooring to whole bits.
const FLOOR_SLACK: f64 = 1e-9;

/// Largest Hamming distance whose estimated cosine is at least `cos`.
#[inline]
#[must_use]
pub fn cosine_to_hamming(cos: f64, bits: usize) -> u32 {
    let angle = cos.clamp(-1.0, 1.0).acos();
    let h = (bits as f64 * angle / PI + FLOOR_SLACK).floor();
    h.clamp(0.0, bits as f64) as u32
}
