//! Content digests for identifiers and canonical URLs.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest used to fingerprint identifier strings.
///
/// MD5 is the default and keeps hashes compatible with existing key stores.
/// It is fine for deduplication keys but offers no collision resistance
/// against crafted input; pick SHA-256 when that matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    /// Length of the hex digest in characters.
    pub fn hex_len(&self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 32,
            DigestAlgorithm::Sha256 => 64,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

/// Hash `text` and return the lowercase hex digest.
pub fn hash_hex(algorithm: DigestAlgorithm, text: &str) -> String {
    match algorithm {
        DigestAlgorithm::Md5 => hex::encode(Md5::digest(text.as_bytes())),
        DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(text.as_bytes())),
    }
}

/// MD5 hex digest of `text`.
pub fn md5_hex(text: &str) -> String {
    hash_hex(DigestAlgorithm::Md5, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_vectors() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hash_hex(DigestAlgorithm::Sha256, "test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_digest_lengths() {
        for algorithm in [DigestAlgorithm::Md5, DigestAlgorithm::Sha256] {
            let digest = hash_hex(algorithm, "www.example.com");
            assert_eq!(digest.len(), algorithm.hex_len());
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(md5_hex("someurl.com/a/c"), md5_hex("someurl.com/a/c"));
        assert_ne!(md5_hex("someurl.com/a/c"), md5_hex("someurl.com/a/d"));
    }

    #[test]
    fn test_default_is_md5() {
        assert_eq!(DigestAlgorithm::default(), DigestAlgorithm::Md5);
        assert_eq!(DigestAlgorithm::Sha256.name(), "sha256");
    }
}
