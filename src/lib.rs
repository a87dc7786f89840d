//! urlkey - Canonical URL identifiers for deduplication and cache keys
//!
//! Two URLs that a person would call "the same page" often differ in case,
//! percent-encoding, port, trailing slash, directory-index filename, query
//! noise or protocol. This crate rewrites both to the same **URL identifier**
//! and **canonical URL**, each fingerprinted with a hex digest.
//!
//! # Quick Start
//!
//! ```
//! use urlkey::canonicalize;
//!
//! let a = canonicalize("HTTP://www.Example.com:8080/docs/index.html?id=42&utm_source=mail")?;
//! let b = canonicalize("https://www.example.com/docs/?id=42")?;
//!
//! assert_eq!(a.url_identifier, "www.example.com/docs?id=42");
//! assert_eq!(a.url_identifier, b.url_identifier);
//! assert_eq!(a.url_identifier_hash, b.url_identifier_hash);
//!
//! // The canonical URL keeps the original protocol but never the query
//! assert_eq!(a.canonical_url, "http://www.example.com/docs");
//! assert_eq!(b.canonical_url, "https://www.example.com/docs");
//! # Ok::<(), urlkey::UrlKeyError>(())
//! ```
//!
//! # Stages
//!
//! | Stage     | Function             | Does |
//! |-----------|----------------------|------|
//! | prepare   | [`prepare`]          | lowercase, percent-decode, parse, drop fragment |
//! | normalize | [`normalize_parsed`] | port, dot segments, directory index, protocol, slashes, query |
//! | derive    | [`derive`]           | identifier, canonical URL, digests |
//!
//! The rewriting rules run in a fixed order; see [`Step::ALL`].
//!
//! # Query parameters
//!
//! A query starting with `id`, `libid` or `p` is treated as identifying and
//! only its first parameter is kept. Any other query is dropped entirely.
//!
//! # Error Handling
//!
//! Only [`prepare`] can fail, returning [`UrlKeyError`]:
//!
//! - `EmptyInput` for an empty string
//! - `DecodeError` for malformed `%` escapes
//! - `ParseError` for structurally invalid URLs

// Re-export the main entry points
pub use crate::core::{canonicalize, Normalizer, NormalizerOptions};

// Re-export pipeline stages
pub use crate::core::{derive, derive_with, normalize as normalize_parsed, url_identifier, Step};
pub use crate::url::{decode_query_component, parse_url, prepare};

// Re-export public types
pub use crate::core::{hash_hex, md5_hex, DigestAlgorithm};
pub use error::{DecodeFailure, ParseFailure, UrlKeyError};
pub use types::{NormalizationResult, ParsedUrl, UrlStructure};

// Module declarations
pub mod core;
pub mod error;
pub mod types;
pub mod url;
