// File: src/model/validation/validators.rs
// Purpose: Basic string checks used by property constraints

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Compiled `Regex` constraints, keyed by pattern source
static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Compile a constraint pattern once per process
///
/// Invalid patterns are not cached and fail again on every call.
pub fn cached_regex(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(regex) = PATTERN_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
    {
        return Ok(regex.clone());
    }

    let regex = Regex::new(pattern)?;
    PATTERN_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(pattern.to_string())
        .or_insert_with(|| regex.clone());
    Ok(regex)
}

/// Length in characters, not bytes
pub fn char_length(value: &str) -> usize {
    value.chars().count()
}
