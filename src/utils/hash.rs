use sha2::{Digest, Sha256};

/// SHA-256 of raw bytes, hex encoded.
#[must_use]
pub fn compute_binary_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// First `len` hex chars of the SHA-256 of `data`.
#[must_use]
pub fn short_hash(data: &[u8], len: usize) -> String {
    compute_binary_hash(data).chars().take(len).collect()
}
