//! Derivation of the URL identifier and canonical URL from a rewritten URL.

use crate::core::hasher::{hash_hex, DigestAlgorithm};
use crate::types::{NormalizationResult, ParsedUrl};

/// Fill the identifier and canonical URL fields of `result` using MD5.
pub fn derive(result: &mut NormalizationResult, parsed: &ParsedUrl) {
    derive_with(result, parsed, DigestAlgorithm::default());
}

/// Fill the identifier and canonical URL fields of `result` with the given digest.
///
/// The identifier hash is left empty when the identifier itself is empty.
/// The canonical URL hash is always computed.
pub fn derive_with(result: &mut NormalizationResult, parsed: &ParsedUrl, algorithm: DigestAlgorithm) {
    let identifier = url_identifier(parsed);
    if !identifier.is_empty() {
        result.url_identifier_hash = hash_hex(algorithm, &identifier);
        result.url_identifier = identifier;
    }

    // The canonical form never carries the query
    result.canonical_url = if result.protocol.is_empty() {
        result.url_identifier.clone()
    } else {
        format!("{}://{}{}", result.protocol, parsed.host, parsed.path)
    };
    result.canonical_url_hash = hash_hex(algorithm, &result.canonical_url);
}

/// `host + path`, plus `?query` when a query survived the pipeline.
pub fn url_identifier(parsed: &ParsedUrl) -> String {
    let mut identifier = format!("{}{}", parsed.host, parsed.path);
    if parsed.has_query() {
        identifier.push('?');
        identifier.push_str(&parsed.raw_query);
    }
    identifier
}
