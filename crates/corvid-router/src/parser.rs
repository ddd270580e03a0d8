//! Convention-based controller addressing
//!
//! When no registered route matches a request path, the path itself names
//! the controller: `/admin/users` addresses `admin/users` and the site root
//! addresses `index`.

use crate::ControllerId;

/// Identifier used for the empty or root path
pub const INDEX_CONTROLLER: &str = "index";

/// Derives controller identifiers from raw request paths
#[derive(Debug, Clone, Default)]
pub struct ControllerPathParser {
    lowercase: bool,
}

impl ControllerPathParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowercase derived identifiers (used with case-insensitive routing)
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Derives the identifier for a path
    ///
    /// ```
    /// use corvid_router::ControllerPathParser;
    ///
    /// let parser = ControllerPathParser::new();
    /// assert_eq!(parser.parse("/").as_str(), "index");
    /// assert_eq!(parser.parse("").as_str(), "index");
    /// assert_eq!(parser.parse("/admin//users/").as_str(), "admin/users");
    /// ```
    pub fn parse(&self, path: &str) -> ControllerId {
        let name = crate::path::decoded_segments(path).join("/");

        if name.is_empty() {
            return ControllerId::new(INDEX_CONTROLLER);
        }

        if self.lowercase {
            ControllerId::new(name.to_lowercase())
        } else {
            ControllerId::new(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_index() {
        let parser = ControllerPathParser::new();
        assert_eq!(parser.parse("/"), ControllerId::new("index"));
        assert_eq!(parser.parse("///"), ControllerId::new("index"));
    }

    #[test]
    fn test_namespaces_keep_slash_separator() {
        let parser = ControllerPathParser::new();
        assert_eq!(parser.parse("/shop/cart"), ControllerId::new("shop/cart"));
        assert_eq!(parser.parse("\\shop\\cart"), ControllerId::new("shop/cart"));
    }

    #[test]
    fn test_segments_are_decoded() {
        let parser = ControllerPathParser::new();
        assert_eq!(parser.parse("/caf%C3%A9/menu"), ControllerId::new("café/menu"));
    }

    #[test]
    fn test_lowercase_option() {
        let parser = ControllerPathParser::new().with_lowercase(true);
        assert_eq!(parser.parse("/Shop/Cart"), ControllerId::new("shop/cart"));

        let parser = ControllerPathParser::new();
        assert_eq!(parser.parse("/Shop/Cart"), ControllerId::new("Shop/Cart"));
    }
}
