//! Content hashing for idempotent link deduplication.

use sha2::{Digest, Sha256};

/// Deterministic fingerprint of a normalized URL.
///
/// SHA-256, hex-encoded. Two submissions of the same normalized URL always
/// produce the same hash, which backs the `(owner_id, domain_id,
/// content_hash)` idempotency key.
pub fn content_hash(normalized_url: &str) -> String {
    hex::encode(Sha256::digest(normalized_url.as_bytes()))
}
