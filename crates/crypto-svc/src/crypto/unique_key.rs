//! Random unique key generation.
//!
//! A key is the lowercase hex SHA-256 digest of 32 bytes from the OS CSPRNG
//! followed by the current Unix time in milliseconds (decimal). Uniqueness is
//! probabilistic: collisions require both a CSPRNG repeat and a SHA-256
//! collision.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Number of random bytes mixed into each key.
pub const SEED_LEN: usize = 32;

/// Length of a generated key in hex characters.
pub const KEY_HEX_LEN: usize = 64;

/// Generate a 64-character lowercase hex key.
///
/// Purely local; never blocks on I/O and never fails. A system clock set
/// before the Unix epoch contributes a timestamp of `0`.
pub fn generate_unique_key() -> String {
    let mut seed = [0u8; SEED_LEN];
    OsRng.fill_bytes(&mut seed);

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    digest_hex(&seed, millis)
}

fn digest_hex(seed: &[u8], millis: u128) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(millis.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
