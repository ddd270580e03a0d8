/// Path utilities for validation, normalization and segmentation
///
/// All functions are pure: same input, same output, no side effects.

use std::borrow::Cow;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use corvid_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/users/42"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("users"));
/// assert!(!is_valid_path("/users/"));
/// assert!(!is_valid_path("/users//42"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Returns `Cow::Borrowed` when the input is already canonical and
/// `Cow::Owned` when it had to be rewritten.
///
/// - Trailing slashes: `/path/` → `/path`
/// - Double slashes: `/path//to` → `/path/to`
/// - Backslashes: `\path\to` → `/path/to`
/// - Missing leading slash: `path` → `/path`
///
/// # Examples
///
/// ```
/// use corvid_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("/about/"), "/about");
/// assert_eq!(normalize_path("\\users\\42"), "/users/42");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Splits a path into its non-empty segments
///
/// Backslashes count as separators, so `segments` agrees with
/// [`normalize_path`] on every input.
///
/// ```
/// use corvid_router::path::segments;
///
/// assert_eq!(segments("/users/42/"), vec!["users", "42"]);
/// assert!(segments("/").is_empty());
/// ```
pub fn segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty()).collect()
}

/// Percent-decodes a single path segment
///
/// Decoding happens after the path is split, so an encoded `%2F` stays
/// inside its segment. Invalid UTF-8 leaves the token as it was.
pub fn decode_segment(token: &str) -> Cow<'_, str> {
    urlencoding::decode(token).unwrap_or(Cow::Borrowed(token))
}

/// Splits a raw path and decodes every segment
pub fn decoded_segments(path: &str) -> Vec<Cow<'_, str>> {
    segments(path).into_iter().map(decode_segment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_separator_stays_in_segment() {
        assert_eq!(decoded_segments("/users/a%2Fb"), vec!["users", "a/b"]);
        assert_eq!(decoded_segments("/caf%C3%A9/x%20y"), vec!["café", "x y"]);
        assert_eq!(decode_segment("100%"), "100%");
    }

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("/"));
        assert!(is_valid_path("/about"));
        assert!(is_valid_path("/users/123"));

        assert!(!is_valid_path(""));
        assert!(!is_valid_path("about"));
        assert!(!is_valid_path("/about/"));
        assert!(!is_valid_path("/about//page"));
        assert!(!is_valid_path("/about\\page"));
    }

    #[test]
    fn test_normalize_path_valid_is_borrowed() {
        assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
        assert!(matches!(normalize_path("/"), Cow::Borrowed("/")));
    }

    #[test]
    fn test_normalize_path_rewrites() {
        assert_eq!(normalize_path("/about/"), "/about");
        assert_eq!(normalize_path("/path///to////page"), "/path/to/page");
        assert_eq!(normalize_path("\\users\\123"), "/users/123");
        assert_eq!(normalize_path("users/123"), "/users/123");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_segments_agree_with_normalization() {
        for raw in ["/a/b/", "a\\b", "//a//b", "/a/b"] {
            let normalized = normalize_path(raw);
            assert_eq!(segments(raw), segments(&normalized));
        }
    }
}
