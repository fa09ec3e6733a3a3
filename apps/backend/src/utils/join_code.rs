//! Join code generation for games.
//!
//! Join codes are 6-character strings using Crockford's Base32 alphabet, so
//! they survive being read aloud and typed by hand.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const JOIN_CODE_LEN: usize = 6;

/// Generate a join code from `rng`.
pub fn generate_join_code(rng: &mut impl Rng) -> String {
    (0..JOIN_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}

/// Canonical form of a typed code: trimmed, uppercased, with the ambiguous
/// letters folded the way Crockford decoding does (I/L to 1, O to 0).
pub fn normalize_join_code(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'I' | 'L' => '1',
            'O' => '0',
            other => other,
        })
        .collect()
}
