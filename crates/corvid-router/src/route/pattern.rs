/// Pattern parsing for route segments
///
/// Route patterns are plain URL paths where a segment wrapped in braces
/// (`{id}`) or prefixed with a colon (`:id`) captures the path token in
/// that position. Everything else is a literal.

use thiserror::Error;

/// A single compiled segment of a route pattern
///
/// # Examples
///
/// ```
/// use corvid_router::route::pattern::{classify_segment, PatternSegment};
///
/// assert_eq!(classify_segment("users"), PatternSegment::Literal("users".into()));
/// assert_eq!(classify_segment("{id}"), PatternSegment::Param("id".into()));
/// assert_eq!(classify_segment(":id"), PatternSegment::Param("id".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Literal text that must equal the path token
    Literal(String),
    /// Named parameter accepting any non-empty token
    Param(String),
}

impl PatternSegment {
    /// Checks a single path token against this segment
    pub fn accepts(&self, token: &str, case_insensitive: bool) -> bool {
        match self {
            PatternSegment::Param(_) => !token.is_empty(),
            PatternSegment::Literal(text) if case_insensitive => text.eq_ignore_ascii_case(token),
            PatternSegment::Literal(text) => text == token,
        }
    }
}

/// Classifies a raw pattern segment (pure function)
///
/// An empty parameter name (`{}` or `:`) is still classified as a
/// parameter; [`compile_pattern`] is responsible for rejecting it.
pub fn classify_segment(segment: &str) -> PatternSegment {
    let param = segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .or_else(|| segment.strip_prefix(':'));

    match param {
        Some(name) => PatternSegment::Param(name.trim().to_string()),
        None => PatternSegment::Literal(segment.to_string()),
    }
}

/// Errors raised while compiling a route pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A placeholder without a name, e.g. `/users/{}`
    #[error("route pattern '{pattern}' has a parameter without a name")]
    EmptyParamName { pattern: String },
    /// The same parameter name used twice in one pattern
    #[error("route pattern '{pattern}' declares parameter '{name}' twice")]
    DuplicateParam { pattern: String, name: String },
}

/// Compiles a full pattern into its segments
///
/// ```
/// use corvid_router::route::pattern::{compile_pattern, PatternSegment};
///
/// let segments = compile_pattern("/users/{id}/").unwrap();
/// assert_eq!(
///     segments,
///     vec![PatternSegment::Literal("users".into()), PatternSegment::Param("id".into())]
/// );
/// ```
pub fn compile_pattern(pattern: &str) -> Result<Vec<PatternSegment>, PatternError> {
    let segments: Vec<PatternSegment> = crate::path::segments(pattern)
        .into_iter()
        .map(classify_segment)
        .collect();

    let mut seen: Vec<&str> = Vec::new();
    for segment in &segments {
        if let PatternSegment::Param(name) = segment {
            if name.is_empty() {
                return Err(PatternError::EmptyParamName {
                    pattern: pattern.to_string(),
                });
            }
            if seen.contains(&name.as_str()) {
                return Err(PatternError::DuplicateParam {
                    pattern: pattern.to_string(),
                    name: name.clone(),
                });
            }
            seen.push(name);
        }
    }

    Ok(segments)
}
