/// Route module
///
/// Contains the compiled [`Route`] and the parameter map produced by a
/// successful match.

pub mod pattern;

pub use pattern::{classify_segment, compile_pattern, PatternError, PatternSegment};

use crate::ControllerId;

/// A route pattern bound to a controller identifier
///
/// The pattern is compiled once, in [`Route::new`]; matching afterwards
/// only walks the compiled segments.
#[derive(Debug, Clone)]
pub struct Route {
    /// Pattern exactly as registered, e.g. "/users/{id}"
    pub pattern: String,
    /// Controller identifier the route resolves to
    pub controller: ControllerId,
    segments: Vec<PatternSegment>,
}

impl Route {
    /// Compiles a route pattern
    ///
    /// ```
    /// use corvid_router::Route;
    ///
    /// let route = Route::new("/users/{id}", "users").unwrap();
    /// assert_eq!(route.param_names(), vec!["id"]);
    /// ```
    pub fn new(
        pattern: impl Into<String>,
        controller: impl Into<ControllerId>,
    ) -> Result<Self, PatternError> {
        let pattern = pattern.into();
        let segments = compile_pattern(&pattern)?;

        Ok(Self {
            pattern,
            controller: controller.into(),
            segments,
        })
    }

    /// Compiled segments of this route
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Names of the parameters in pattern order
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                PatternSegment::Param(name) => Some(name.as_str()),
                PatternSegment::Literal(_) => None,
            })
            .collect()
    }

    /// Matches this route against a path (case-sensitive)
    pub fn matches(&self, path: &str) -> Option<Params> {
        self.matches_with_options(path, false)
    }

    /// Matches this route against a path
    ///
    /// A path with a different number of segments never matches. Literal
    /// segments must equal their token, parameter segments take any
    /// non-empty token. Tokens are percent-decoded after splitting.
    pub fn matches_with_options(&self, path: &str, case_insensitive: bool) -> Option<Params> {
        let tokens = crate::path::decoded_segments(path);
        if tokens.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::default();
        for (segment, token) in self.segments.iter().zip(tokens) {
            if !segment.accepts(&token, case_insensitive) {
                return None;
            }
            if let PatternSegment::Param(name) = segment {
                params.insert(name.clone(), token.into_owned());
            }
        }

        Some(params)
    }
}

/// Path parameters extracted by a match, in pattern order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter, keeping its original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Get a parameter value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Get a parameter parsed as a specific type
    pub fn get_as<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get(name)?.parse().ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate parameters in pattern order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
