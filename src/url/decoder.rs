//! Strict percent-decoding of raw input URLs.
//!
//! `percent_encoding` leaves malformed escapes untouched. Inputs with a stray
//! `%` must be rejected instead, so escapes are validated before decoding.

use percent_encoding::percent_decode_str;

use crate::error::DecodeFailure;

/// Decode a string using query-component rules: `+` is a space and every
/// `%XX` escape is replaced by its byte.
///
/// # Examples
///
/// ```
/// use urlkey::decode_query_component;
///
/// let decoded = decode_query_component("http%3a%2f%2fexample.com%2fa+b").unwrap();
/// assert_eq!(decoded, "http://example.com/a b");
/// assert!(decode_query_component("100%").is_err());
/// ```
pub fn decode_query_component(input: &str) -> Result<String, DecodeFailure> {
    if let Some(escape) = find_invalid_escape(input) {
        return Err(DecodeFailure::InvalidEscape(escape));
    }

    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeFailure::InvalidUtf8)
}

/// Return the text of the first `%` escape that is not followed by two hex
/// digits, truncated to at most three bytes.
pub(crate) fn find_invalid_escape(input: &str) -> Option<String> {
    let bytes = input.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        if b != b'%' {
            continue;
        }
        let valid = i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit();
        if !valid {
            let end = (i + 3).min(bytes.len());
            return Some(String::from_utf8_lossy(&bytes[i..end]).into_owned());
        }
    }

    None
}
