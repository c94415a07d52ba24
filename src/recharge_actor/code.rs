use rand::Rng;

/// Characters a recharge code is drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws a code of `length` characters uniformly from [`CODE_ALPHABET`].
///
/// Uniqueness is not checked here; the card store refuses a code it already
/// holds and the issuer draws again.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
