//! Human-readable booking reference codes.

use rand::Rng;

/// Uppercase alphabet without the look-alikes `0`, `O`, `1` and `I`.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of random characters after the prefix.
const CODE_LENGTH: usize = 8;

/// Generate a reference such as `RSV-7KQ2MZ4P`.
pub fn generate_reference(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let code: String = (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{prefix}-{code}")
}
