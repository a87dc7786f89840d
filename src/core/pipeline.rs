//! The URL rewriting pipeline.
//!
//! Seven rules run in a fixed order over one [`ParsedUrl`]. Several rules
//! depend on the ones before them: the port must be gone before dot-segment
//! resolution checks the host boundary, and the directory index must be
//! stripped before duplicate slashes collapse.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::types::ParsedUrl;

// `\w` is spelled out so that it stays ASCII-only
static DIRECTORY_INDEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|/)((?:default|index)\.[0-9A-Za-z_]{1,4})$")
        .expect("directory index pattern is valid")
});

static DUPLICATE_SLASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/{2,}").expect("duplicate slash pattern is valid"));

static IDENTIFYING_QUERY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(id|libid|p)=*").expect("query id pattern is valid"));

/// A single rewriting rule of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    RemoveDefaultPort,
    RemoveDotSegments,
    RemoveDirectoryIndex,
    RemoveProtocol,
    RemoveDuplicateSlashes,
    RemoveTrailingSlash,
    HandleQueryParams,
}

impl Step {
    /// Every step, in the order the pipeline applies them.
    pub const ALL: [Step; 7] = [
        Step::RemoveDefaultPort,
        Step::RemoveDotSegments,
        Step::RemoveDirectoryIndex,
        Step::RemoveProtocol,
        Step::RemoveDuplicateSlashes,
        Step::RemoveTrailingSlash,
        Step::HandleQueryParams,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Step::RemoveDefaultPort => "remove_default_port",
            Step::RemoveDotSegments => "remove_dot_segments",
            Step::RemoveDirectoryIndex => "remove_directory_index",
            Step::RemoveProtocol => "remove_protocol",
            Step::RemoveDuplicateSlashes => "remove_duplicate_slashes",
            Step::RemoveTrailingSlash => "remove_trailing_slash",
            Step::HandleQueryParams => "handle_query_params",
        }
    }

    /// Apply this step alone.
    pub fn apply(self, url: &mut ParsedUrl) {
        match self {
            Step::RemoveDefaultPort => remove_default_port(url),
            Step::RemoveDotSegments => remove_dot_segments(url),
            Step::RemoveDirectoryIndex => remove_directory_index(url),
            Step::RemoveProtocol => remove_protocol(url),
            Step::RemoveDuplicateSlashes => remove_duplicate_slashes(url),
            Step::RemoveTrailingSlash => remove_trailing_slash(url),
            Step::HandleQueryParams => handle_query_params(url),
        }
    }
}

/// Run every rewriting rule over `url`, in order.
///
/// # Examples
///
/// ```
/// use urlkey::{normalize_parsed, ParsedUrl};
///
/// let mut url = ParsedUrl::new("http", "www.example.com:8080", "/a/./b/../index.html", "id=9&utm=x");
/// normalize_parsed(&mut url);
/// assert_eq!(url, ParsedUrl::new("", "www.example.com", "/a", "id=9"));
/// ```
pub fn normalize(url: &mut ParsedUrl) {
    for step in Step::ALL {
        step.apply(url);
        trace!(step = step.name(), url = %url, "applied rewrite rule");
    }
}

/// Drop everything from the first `:` in the host, whatever the port.
pub fn remove_default_port(url: &mut ParsedUrl) {
    if let Some(colon) = url.host.find(':') {
        url.host.truncate(colon);
    }
}

/// Resolve `.` and `..` path segments.
///
/// A `..` with nothing left to pop is dropped rather than kept, so paths
/// cannot climb above the root. Empty segments are kept as they are and
/// cleaned up later by [`remove_duplicate_slashes`].
pub fn remove_dot_segments(url: &mut ParsedUrl) {
    if url.path.is_empty() {
        return;
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut last_is_dot = false;

    for segment in url.path.split('/') {
        match segment {
            ".." => {
                kept.pop();
            }
            "." => {}
            _ => kept.push(segment),
        }
        last_is_dot = segment == "." || segment == "..";
    }

    let mut path = kept.join("/");
    if !url.host.is_empty() && !url.host.ends_with('/') && !path.starts_with('/') {
        path.insert(0, '/');
    }
    if last_is_dot && !path.ends_with('/') {
        path.push('/');
    }

    url.path = path;
}

/// Strip a trailing `index.*` or `default.*` file, keeping its directory.
pub fn remove_directory_index(url: &mut ParsedUrl) {
    if url.path.is_empty() {
        return;
    }
    let stripped = DIRECTORY_INDEX.replace(&url.path, "$1");
    if stripped != url.path {
        url.path = stripped.into_owned();
    }
}

pub fn remove_protocol(url: &mut ParsedUrl) {
    url.scheme.clear();
}

/// Collapse every run of slashes in the path into one.
pub fn remove_duplicate_slashes(url: &mut ParsedUrl) {
    if url.path.is_empty() {
        return;
    }
    let collapsed = DUPLICATE_SLASHES.replace_all(&url.path, "/");
    if collapsed != url.path {
        url.path = collapsed.into_owned();
    }
}

/// Drop one trailing `/` from the path, or from the host when the path is empty.
pub fn remove_trailing_slash(url: &mut ParsedUrl) {
    if !url.path.is_empty() {
        if url.path.ends_with('/') {
            url.path.pop();
        }
    } else if url.host.ends_with('/') {
        url.host.pop();
    }
}

/// Keep the first parameter of an identifying query (`id`, `libid`, `p`),
/// drop any other query entirely.
pub fn handle_query_params(url: &mut ParsedUrl) {
    if IDENTIFYING_QUERY.is_match(&url.raw_query) {
        if let Some(amp) = url.raw_query.find('&') {
            url.raw_query.truncate(amp);
        }
    } else {
        url.raw_query.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_url(path: &str) -> ParsedUrl {
        ParsedUrl::new("http", "www.example.com", path, "")
    }

    #[test]
    fn test_remove_default_port() {
        let mut url = ParsedUrl::new("http", "www.example.com:8080", "/", "");
        remove_default_port(&mut url);
        assert_eq!(url.host, "www.example.com");

        // Any port goes, and only the first colon counts
        let mut url = ParsedUrl::new("http", "https::443", "", "");
        remove_default_port(&mut url);
        assert_eq!(url.host, "https");
    }

    #[test]
    fn test_remove_dot_segments() {
        let mut url = path_url("/../a/b/../c/./d.html");
        remove_dot_segments(&mut url);
        assert_eq!(url.path, "/a/c/d.html");
    }

    #[test]
    fn test_dot_segments_trailing_dot_keeps_slash() {
        let mut url = path_url("/a/b/..");
        remove_dot_segments(&mut url);
        assert_eq!(url.path, "/a/");

        let mut url = path_url("/a/.");
        remove_dot_segments(&mut url);
        assert_eq!(url.path, "/a/");

        let mut url = path_url("/..");
        remove_dot_segments(&mut url);
        assert_eq!(url.path, "/");
    }

    #[test]
    fn test_dot_segments_keep_empty_segments() {
        let mut url = path_url("/a//b/../c");
        remove_dot_segments(&mut url);
        assert_eq!(url.path, "/a//c");
    }

    #[test]
    fn test_dot_segments_without_host() {
        let mut url = ParsedUrl::new("", "", "a/./b/../c", "");
        remove_dot_segments(&mut url);
        assert_eq!(url.path, "a/c");

        let mut url = ParsedUrl::new("", "", "", "");
        remove_dot_segments(&mut url);
        assert_eq!(url.path, "");
    }

    #[test]
    fn test_remove_directory_index() {
        for (input, expected) in [
            ("/default.asp", "/"),
            ("/a/index.html", "/a/"),
            ("index.php", ""),
            ("/a/index.shtml", "/a/index.shtml"),
            ("/a/myindex.html", "/a/myindex.html"),
            ("/index.html/b", "/index.html/b"),
        ] {
            let mut url = path_url(input);
            remove_directory_index(&mut url);
            assert_eq!(url.path, expected, "directory index removal failed for {}", input);
        }
    }

    #[test]
    fn test_remove_protocol() {
        let mut url = path_url("/a");
        remove_protocol(&mut url);
        assert_eq!(url.scheme, "");
        assert_eq!(url.host, "www.example.com");
    }

    #[test]
    fn test_remove_duplicate_slashes() {
        let mut url = path_url("/foo//bar.html");
        remove_duplicate_slashes(&mut url);
        assert_eq!(url.path, "/foo/bar.html");

        let mut url = path_url("////a///b//");
        remove_duplicate_slashes(&mut url);
        assert_eq!(url.path, "/a/b/");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let mut url = path_url("/alice/");
        remove_trailing_slash(&mut url);
        assert_eq!(url.path, "/alice");

        let mut url = ParsedUrl::new("", "example.com/", "", "");
        remove_trailing_slash(&mut url);
        assert_eq!(url.host, "example.com");

        // Only a single slash is removed
        let mut url = path_url("//");
        remove_trailing_slash(&mut url);
        assert_eq!(url.path, "/");
    }

    #[test]
    fn test_handle_query_params() {
        for (query, expected) in [
            ("id=1234&utm=a", "id=1234"),
            ("libid=1234&utm=b", "libid=1234"),
            ("p=1234&utm=b", "p=1234"),
            ("ID=7&x=1", "ID=7"),
            ("id=5", "id=5"),
            ("cid=1234&id=345&libid=67890", ""),
            ("utm_source=mail", ""),
            ("", ""),
        ] {
            let mut url = ParsedUrl::new("", "www.example.com", "", query);
            handle_query_params(&mut url);
            assert_eq!(url.raw_query, expected, "query handling failed for {:?}", query);
        }
    }

    #[test]
    fn test_identifying_prefix_needs_no_equals() {
        // The pattern allows zero `=`, so any query starting with `p` counts
        let mut url = ParsedUrl::new("", "www.example.com", "", "page=2&sort=asc");
        handle_query_params(&mut url);
        assert_eq!(url.raw_query, "page=2");
    }

    #[test]
    fn test_step_order() {
        let names: Vec<&str> = Step::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "remove_default_port",
                "remove_dot_segments",
                "remove_directory_index",
                "remove_protocol",
                "remove_duplicate_slashes",
                "remove_trailing_slash",
                "handle_query_params",
            ]
        );
    }

    #[test]
    fn test_directory_index_before_duplicate_slashes() {
        let mut url = path_url("//index.html");
        normalize(&mut url);
        assert_eq!(url.path, "");
        assert_eq!(url.host, "www.example.com");
    }

    #[test]
    fn test_normalize_full_pipeline() {
        let mut url = ParsedUrl::new("http", "someurl.com:8080", "/a/ /.././c///index.html", "c=3&a=1");
        normalize(&mut url);
        assert_eq!(url, ParsedUrl::new("", "someurl.com", "/a/c", ""));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut url = ParsedUrl::new("https", "example.com:443", "/x/../y/index.htm", "p=1&q=2");
        normalize(&mut url);
        let once = url.clone();
        normalize(&mut url);
        assert_eq!(url, once);
    }
}
