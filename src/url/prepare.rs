//! Input preparation: lowercase, decode, parse, drop the fragment.

use tracing::debug;

use crate::error::UrlKeyError;
use crate::types::{NormalizationResult, ParsedUrl};
use crate::url::decoder::decode_query_component;
use crate::url::parser::parse;

/// Turn a caller-supplied URL string into the result record and the working
/// copy the pipeline rewrites.
///
/// The whole input is lowercased before decoding, so path and query content
/// become case-insensitive too. Only `raw_url`, `protocol` and
/// `raw_query_params` are filled in on the returned record.
///
/// # Examples
///
/// ```
/// use urlkey::prepare;
///
/// let (result, parsed) = prepare("HTTP://Example.COM:8080/A?ID=1#Top").unwrap();
/// assert_eq!(result.raw_url, "http://example.com:8080/a?id=1#top");
/// assert_eq!(result.protocol, "http");
/// assert_eq!(result.raw_query_params, "id=1");
/// assert_eq!(parsed.host, "example.com:8080");
/// assert!(result.url_identifier.is_empty());
/// ```
pub fn prepare(raw_input: &str) -> Result<(NormalizationResult, ParsedUrl), UrlKeyError> {
    if raw_input.is_empty() {
        return Err(UrlKeyError::EmptyInput);
    }

    let lowered = lowercase_simple(raw_input);

    let decoded = decode_query_component(&lowered).map_err(|err| {
        debug!(input = %lowered, error = %err, "failed to decode URL");
        UrlKeyError::from(err)
    })?;

    let structure = parse(&decoded).map_err(|err| {
        debug!(input = %decoded, error = %err, "failed to parse URL");
        UrlKeyError::from(err)
    })?;

    // The fragment, userinfo and opaque part play no role in identity
    let parsed = ParsedUrl::from(structure);

    let result = NormalizationResult {
        raw_url: decoded,
        protocol: parsed.scheme.clone(),
        raw_query_params: parsed.raw_query.clone(),
        ..Default::default()
    };

    Ok((result, parsed))
}

/// Lowercase each character on its own with a one-to-one mapping.
///
/// `str::to_lowercase` turns a word-final `Σ` into `ς` and `İ` into two
/// characters. Identifiers need every character mapped independently.
pub(crate) fn lowercase_simple(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{130}' => 'i',
            _ => c.to_lowercase().next().unwrap_or(c),
        })
        .collect()
}
