//! Room code generation.
//!
//! Room codes are short strings over Crockford's Base32 alphabet so they can
//! be read aloud and typed without ambiguity.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const ROOM_CODE_LEN: usize = 6;

/// Generate a random room code of [`ROOM_CODE_LEN`] characters.
///
/// Uniqueness is not guaranteed here; the registry retries on collision.
///
/// # Example
/// ```
/// use blot_server::utils::join_code::generate_room_code;
///
/// let code = generate_room_code();
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}

/// Canonical form of a user-typed code: trimmed, uppercased, with the
/// Crockford look-alikes folded (`O` -> `0`, `I`/`L` -> `1`).
pub fn normalize_room_code(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'O' => '0',
            'I' | 'L' => '1',
            other => other,
        })
        .collect()
}
