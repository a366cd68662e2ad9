//! Client id fingerprinting for startup logs.
//!
//! Operators can confirm which provider account the relay uses without the
//! identifier itself appearing in logs.

use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 of a credential, as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use fastpass::outbound::truv::fingerprint::credential_fingerprint;
///
/// let fp = credential_fingerprint("client-1");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn credential_fingerprint(credential: &str) -> String {
    let digest = Sha256::digest(credential.as_bytes());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
