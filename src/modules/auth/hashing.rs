use sha2::{Digest, Sha256};

/// One-way digest applied to identifiers and passwords before storage
pub trait CredentialHasher {
    fn digest(&self, input: &str) -> String;
}

/// Unsalted SHA-256 rendered as lowercase hex.
///
/// Equal inputs always hash equal, which is what lookups rely on. It offers no
/// protection for stored passwords; swap in a salted slow hash for real use.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl CredentialHasher for Sha256Hasher {
    fn digest(&self, input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }
}
