//! URL structure parser.
//!
//! Splits a decoded URL string into scheme, userinfo, host, path, query and
//! fragment. The grammar is lenient: anything without a recognisable scheme
//! is a relative path, and `scheme:` followed by something other than `/` is
//! kept as an opaque part with no host or path.

use percent_encoding::percent_decode_str;

use crate::error::ParseFailure;
use crate::types::UrlStructure;
use crate::url::decoder::find_invalid_escape;

/// Which URL component is being unescaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Userinfo,
    Host,
    Path,
    Fragment,
}

/// Parse a URL string into its structural components.
///
/// # Examples
///
/// ```
/// use urlkey::parse_url;
///
/// let parts = parse_url("http://www.example.com:8080/a/b?id=1#top").unwrap();
/// assert_eq!(parts.scheme, "http");
/// assert_eq!(parts.host, "www.example.com:8080");
/// assert_eq!(parts.path, "/a/b");
/// assert_eq!(parts.raw_query, "id=1");
/// assert_eq!(parts.fragment, "top");
/// ```
pub fn parse(input: &str) -> Result<UrlStructure, ParseFailure> {
    let (reference, fragment) = match input.split_once('#') {
        Some((reference, fragment)) => (reference, Some(fragment)),
        None => (input, None),
    };

    let mut parts = parse_reference(reference)?;
    if let Some(fragment) = fragment {
        parts.fragment = unescape(fragment, Component::Fragment)?;
    }

    Ok(parts)
}

fn parse_reference(input: &str) -> Result<UrlStructure, ParseFailure> {
    if input.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return Err(ParseFailure::ControlCharacter);
    }

    let mut parts = UrlStructure::default();

    if input == "*" {
        parts.path = "*".to_string();
        return Ok(parts);
    }

    let (scheme, mut rest) = split_scheme(input)?;
    parts.scheme = scheme.to_ascii_lowercase();

    // A lone trailing `?` means an empty query
    if rest.ends_with('?') && rest.matches('?').count() == 1 {
        rest = &rest[..rest.len() - 1];
    } else if let Some((before, query)) = rest.split_once('?') {
        rest = before;
        parts.raw_query = query.to_string();
    }

    if !rest.starts_with('/') {
        if !parts.scheme.is_empty() {
            parts.opaque = rest.to_string();
            return Ok(parts);
        }
        let first_segment = rest.split('/').next().unwrap_or(rest);
        if first_segment.contains(':') {
            return Err(ParseFailure::ColonInFirstSegment);
        }
    }

    if (!parts.scheme.is_empty() || !rest.starts_with("///")) && rest.starts_with("//") {
        let after_slashes = &rest[2..];
        let (authority, path) = match after_slashes.find('/') {
            Some(i) => after_slashes.split_at(i),
            None => (after_slashes, ""),
        };
        let (userinfo, host) = parse_authority(authority)?;
        parts.userinfo = userinfo;
        parts.host = host;
        rest = path;
    }

    parts.path = unescape(rest, Component::Path)?;
    Ok(parts)
}

/// Split `scheme:rest`. Returns an empty scheme when the input has none.
fn split_scheme(input: &str) -> Result<(&str, &str), ParseFailure> {
    for (i, b) in input.bytes().enumerate() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' => {}
            b'0'..=b'9' | b'+' | b'-' | b'.' => {
                if i == 0 {
                    return Ok(("", input));
                }
            }
            b':' => {
                if i == 0 {
                    return Err(ParseFailure::MissingScheme);
                }
                return Ok((&input[..i], &input[i + 1..]));
            }
            _ => return Ok(("", input)),
        }
    }
    Ok(("", input))
}

fn parse_authority(authority: &str) -> Result<(Option<String>, String), ParseFailure> {
    let Some(at) = authority.rfind('@') else {
        return Ok((None, parse_host(authority)?));
    };

    let host = parse_host(&authority[at + 1..])?;
    let userinfo = &authority[..at];
    if !is_valid_userinfo(userinfo) {
        return Err(ParseFailure::InvalidUserinfo);
    }
    let userinfo = unescape(userinfo, Component::Userinfo)?;

    Ok((Some(userinfo), host))
}

fn parse_host(host: &str) -> Result<String, ParseFailure> {
    if host.starts_with('[') {
        // IPv6 literal, optionally followed by a port
        let close = host.rfind(']').ok_or(ParseFailure::MissingBracket)?;
        let colon_port = &host[close + 1..];
        if !is_valid_optional_port(colon_port) {
            return Err(ParseFailure::InvalidPort(colon_port.to_string()));
        }
    } else if let Some(colon) = host.rfind(':') {
        let colon_port = &host[colon..];
        if !is_valid_optional_port(colon_port) {
            return Err(ParseFailure::InvalidPort(colon_port.to_string()));
        }
    }

    unescape(host, Component::Host)
}

/// Either empty or `:` followed by digits only.
fn is_valid_optional_port(port: &str) -> bool {
    match port.strip_prefix(':') {
        Some(digits) => digits.bytes().all(|b| b.is_ascii_digit()),
        None => port.is_empty(),
    }
}

fn is_valid_userinfo(userinfo: &str) -> bool {
    userinfo.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(
                c,
                '-' | '.' | '_' | ':' | '~' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+'
                    | ',' | ';' | '=' | '%' | '@'
            )
    })
}

/// ASCII bytes that may not appear literally in a host.
fn is_forbidden_in_host(b: u8) -> bool {
    !(b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'_' | b'.' | b'~' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+'
                | b',' | b';' | b'=' | b':' | b'[' | b']' | b'<' | b'>' | b'"'
        ))
}

fn unescape(s: &str, component: Component) -> Result<String, ParseFailure> {
    if let Some(escape) = find_invalid_escape(s) {
        return Err(ParseFailure::InvalidEscape(escape));
    }
    if component == Component::Host {
        check_host_bytes(s)?;
    }

    percent_decode_str(s)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ParseFailure::InvalidEscape(s.to_string()))
}

/// Hosts may only percent-encode non-ASCII bytes (plus `%25`) and may not
/// contain reserved ASCII characters literally. Escapes are already valid.
fn check_host_bytes(host: &str) -> Result<(), ParseFailure> {
    let bytes = host.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' {
            let escape = &host[i..i + 3];
            if bytes[i + 1] < b'8' && escape != "%25" {
                return Err(ParseFailure::InvalidEscape(escape.to_string()));
            }
            i += 3;
        } else {
            if b < 0x80 && is_forbidden_in_host(b) {
                return Err(ParseFailure::InvalidHostCharacter(b as char));
            }
            i += 1;
        }
    }

    Ok(())
}
