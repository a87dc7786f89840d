//! Core data structures shared by the preparer, pipeline, and deriver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Working copy of a URL that the normalization pipeline rewrites in place.
///
/// The fragment is never stored: it is discarded when the URL is prepared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    /// URL scheme, empty when absent or once the protocol has been removed
    pub scheme: String,
    /// Host, possibly followed by `:port`
    pub host: String,
    /// Path, normally starting with `/` when a host is present
    pub path: String,
    /// Unescaped query string without the leading `?`
    pub raw_query: String,
}

impl ParsedUrl {
    /// Create a parsed URL from its components.
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
        raw_query: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            path: path.into(),
            raw_query: raw_query.into(),
        }
    }

    /// Check if a scheme is still present.
    pub fn has_scheme(&self) -> bool {
        !self.scheme.is_empty()
    }

    /// Check if query parameters are present.
    pub fn has_query(&self) -> bool {
        !self.raw_query.is_empty()
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_scheme() {
            write!(f, "{}://", self.scheme)?;
        }
        write!(f, "{}{}", self.host, self.path)?;
        if self.has_query() {
            write!(f, "?{}", self.raw_query)?;
        }
        Ok(())
    }
}

/// Every component the structure parser recognises in a URL string.
///
/// Only scheme, host, path and query survive into a [`ParsedUrl`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlStructure {
    /// Scheme without the trailing `:`
    pub scheme: String,
    /// Everything after `scheme:` when it does not start with `/` (e.g. `mailto:x`)
    pub opaque: String,
    /// Unescaped `user[:password]` before the last `@` of the authority
    pub userinfo: Option<String>,
    /// Unescaped host including any `:port`
    pub host: String,
    /// Unescaped path
    pub path: String,
    /// Query string without the leading `?`, left escaped as given
    pub raw_query: String,
    /// Unescaped fragment without the leading `#`
    pub fragment: String,
}

impl UrlStructure {
    /// Check if the URL has an opaque part instead of a hierarchical one.
    pub fn is_opaque(&self) -> bool {
        !self.opaque.is_empty()
    }
}

impl From<UrlStructure> for ParsedUrl {
    fn from(parts: UrlStructure) -> Self {
        ParsedUrl {
            scheme: parts.scheme,
            host: parts.host,
            path: parts.path,
            raw_query: parts.raw_query,
        }
    }
}

/// The outcome of normalizing one input URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationResult {
    /// Lowercased and percent-decoded form of the caller's input
    pub raw_url: String,
    /// Scheme captured before the pipeline removed it
    pub protocol: String,
    /// `protocol://host+path`, or the identifier when there was no protocol
    pub canonical_url: String,
    /// Hex digest of `canonical_url`
    pub canonical_url_hash: String,
    /// `host+path[?first-param]`, the dedup key
    pub url_identifier: String,
    /// Hex digest of `url_identifier`, empty when the identifier is empty
    pub url_identifier_hash: String,
    /// Query string as parsed, before any trimming
    pub raw_query_params: String,
}

impl fmt::Display for NormalizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "raw_url: {}", self.raw_url)?;
        writeln!(f, "protocol: {}", self.protocol)?;
        writeln!(f, "canonical_url: {}", self.canonical_url)?;
        writeln!(f, "canonical_url_hash: {}", self.canonical_url_hash)?;
        writeln!(f, "url_identifier: {}", self.url_identifier)?;
        writeln!(f, "url_identifier_hash: {}", self.url_identifier_hash)?;
        writeln!(f, "raw_query_params: {}", self.raw_query_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_url_display() {
        let url = ParsedUrl::new("http", "www.example.com", "/a", "id=1");
        assert_eq!(url.to_string(), "http://www.example.com/a?id=1");

        let bare = ParsedUrl::new("", "www.example.com", "", "");
        assert_eq!(bare.to_string(), "www.example.com");
    }

    #[test]
    fn test_structure_into_parsed_url() {
        let parts = UrlStructure {
            scheme: "https".to_string(),
            userinfo: Some("alice".to_string()),
            host: "example.com:8080".to_string(),
            path: "/docs".to_string(),
            raw_query: "p=2".to_string(),
            fragment: "top".to_string(),
            ..Default::default()
        };

        let parsed = ParsedUrl::from(parts);
        assert_eq!(parsed, ParsedUrl::new("https", "example.com:8080", "/docs", "p=2"));
    }

    #[test]
    fn test_result_display_order() {
        let result = NormalizationResult {
            raw_url: "a".to_string(),
            protocol: "b".to_string(),
            canonical_url: "c".to_string(),
            canonical_url_hash: "d".to_string(),
            url_identifier: "e".to_string(),
            url_identifier_hash: "f".to_string(),
            raw_query_params: "g".to_string(),
        };

        let rendered = result.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "raw_url: a",
                "protocol: b",
                "canonical_url: c",
                "canonical_url_hash: d",
                "url_identifier: e",
                "url_identifier_hash: f",
                "raw_query_params: g",
            ]
        );
    }

    #[test]
    fn test_result_empty_by_default() {
        let result = NormalizationResult::default();
        assert!(result.url_identifier.is_empty());
        assert!(result.canonical_url_hash.is_empty());
    }
}
