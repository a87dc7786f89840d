//! One-call normalization: prepare, rewrite, derive.

use serde::{Deserialize, Serialize};

use crate::core::deriver::derive_with;
use crate::core::hasher::DigestAlgorithm;
use crate::core::pipeline::normalize;
use crate::error::UrlKeyError;
use crate::types::NormalizationResult;
use crate::url::prepare::prepare;

/// Options controlling how identifiers are fingerprinted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerOptions {
    /// Digest used for both identifier and canonical URL hashes
    pub digest: DigestAlgorithm,
}

/// Turns raw URLs into [`NormalizationResult`]s.
///
/// A normalizer holds no state between calls and can be shared freely
/// across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    options: NormalizerOptions,
}

impl Normalizer {
    /// Create a normalizer with MD5 digests.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: NormalizerOptions) -> Self {
        Self { options }
    }

    pub fn digest(&self) -> DigestAlgorithm {
        self.options.digest
    }

    /// Normalize one raw URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlkey::Normalizer;
    ///
    /// let result = Normalizer::new().normalize("HTTP://www.Example.com:8080/a/index.html?id=7&utm=x")?;
    /// assert_eq!(result.url_identifier, "www.example.com/a?id=7");
    /// assert_eq!(result.canonical_url, "http://www.example.com/a");
    /// assert_eq!(result.url_identifier_hash.len(), 32);
    /// # Ok::<(), urlkey::UrlKeyError>(())
    /// ```
    pub fn normalize(&self, raw_url: &str) -> Result<NormalizationResult, UrlKeyError> {
        let (mut result, mut parsed) = prepare(raw_url)?;
        normalize(&mut parsed);
        derive_with(&mut result, &parsed, self.options.digest);
        Ok(result)
    }
}

/// Normalize a raw URL with default options.
pub fn canonicalize(raw_url: &str) -> Result<NormalizationResult, UrlKeyError> {
    Normalizer::new().normalize(raw_url)
}
