//! Generated credentials.

use rand::rngs::OsRng;
use rand::Rng;

/// Symbols allowed in generated passwords, after the alphanumerics.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.?/";

/// Every character a generated password may contain.
pub const PASSWORD_CHARSET: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz",
    "0123456789",
    "!@#$%^&*()-_=+[]{};:,.?/"
);

/// Upper bound on requested lengths.
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Draw `length` characters uniformly from [`PASSWORD_CHARSET`] using the
/// operating system's CSPRNG.
pub fn generate_password(length: usize) -> String {
    let charset = PASSWORD_CHARSET.as_bytes();
    let mut rng = OsRng;
    (0..length.min(MAX_PASSWORD_LENGTH))
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}
