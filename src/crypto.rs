use sha3::{Digest, Keccak256};

/// Keccak256 over several blobs, each prefixed with its length so that
/// moving bytes between blobs changes the digest.
pub fn fingerprint(parts: &[&[u8]]) -> String {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    format!("0x{}", hex::encode(hasher.finalize()))
}
