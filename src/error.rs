//! Error types for URL preparation.
//!
//! Only the preparation stage can fail. Once a [`crate::ParsedUrl`] exists the
//! rewriting pipeline and identifier derivation are total.

use thiserror::Error;

/// Errors returned when an input URL cannot be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlKeyError {
    /// The input string was empty.
    #[error("Empty input URL")]
    EmptyInput,

    /// Percent-decoding the lowercased input failed.
    #[error("URL decoding failed: {0}")]
    DecodeError(String),

    /// The decoded string is not a structurally valid URL.
    #[error("URL parsing failed: {0}")]
    ParseError(String),
}

impl UrlKeyError {
    /// Stable machine-readable code for the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            UrlKeyError::EmptyInput => "EmptyInputUrl",
            UrlKeyError::DecodeError(_) => "DecodeUrlError",
            UrlKeyError::ParseError(_) => "ParseError",
        }
    }
}

/// Failure raised by the strict percent decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    /// A `%` was not followed by two hexadecimal digits.
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),

    /// The decoded bytes are not valid UTF-8.
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Failure raised by the URL structure parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("invalid control character in URL")]
    ControlCharacter,

    #[error("missing protocol scheme")]
    MissingScheme,

    #[error("first path segment in URL cannot contain colon")]
    ColonInFirstSegment,

    #[error("invalid userinfo")]
    InvalidUserinfo,

    #[error("missing ']' in host")]
    MissingBracket,

    #[error("invalid port {0:?} after host")]
    InvalidPort(String),

    #[error("invalid character {0:?} in host name")]
    InvalidHostCharacter(char),

    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),
}

impl From<DecodeFailure> for UrlKeyError {
    fn from(err: DecodeFailure) -> Self {
        UrlKeyError::DecodeError(err.to_string())
    }
}

impl From<ParseFailure> for UrlKeyError {
    fn from(err: ParseFailure) -> Self {
        UrlKeyError::ParseError(err.to_string())
    }
}
