//! # Corvid Router
//!
//! A small routing library for the Corvid controller pipeline:
//! - Explicit route patterns (`/users/{id}`, `/posts/:slug`)
//! - First-match-wins lookup in registration order
//! - Convention-based fallback that derives a controller identifier from
//!   the request path itself
//!
//! ## Path Normalization
//!
//! Trailing slashes, duplicate slashes and backslashes are tolerated on
//! both patterns and request paths, so `/users/42/` and `/users//42`
//! match the same routes as `/users/42`.
//!
//! Request paths are expected raw. Each segment is percent-decoded after
//! splitting, so `/users/a%2Fb` is two segments with `id = "a/b"`.
//!
//! ## Example
//!
//! ```
//! use corvid_router::{ControllerPathParser, Route, RouteMatcher};
//!
//! let matcher = RouteMatcher::new()
//!     .with_route(Route::new("/users/{id}", "users").unwrap());
//!
//! let found = matcher.match_path("/users/42").unwrap();
//! assert_eq!(found.controller.as_str(), "users");
//! assert_eq!(found.params.get("id"), Some("42"));
//!
//! assert!(matcher.match_path("/about").is_none());
//! assert_eq!(ControllerPathParser::new().parse("/about").as_str(), "about");
//! ```

use std::fmt;

pub mod parser;
pub mod path;
pub mod route;

pub use parser::{ControllerPathParser, INDEX_CONTROLLER};
pub use path::{decode_segment, is_valid_path, normalize_path};
pub use route::{PatternError, PatternSegment, Params, Route};

// ============================================================================
// Core Types
// ============================================================================

/// Logical controller identifier, e.g. "users" or "admin/settings"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(String);

impl ControllerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ControllerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ControllerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Result of matching a path against the route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Controller identifier of the matched route
    pub controller: ControllerId,
    /// Pattern that matched
    pub pattern: String,
    /// Extracted path parameters
    pub params: Params,
}

// ============================================================================
// Route Matcher
// ============================================================================

/// Ordered route table
///
/// Built once at startup and only read afterwards. Routes are never
/// re-sorted: registration order is the matching priority.
#[derive(Debug, Clone, Default)]
pub struct RouteMatcher {
    routes: Vec<Route>,
    case_insensitive: bool,
}

impl RouteMatcher {
    /// Creates an empty, case-sensitive matcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets ASCII case-insensitive comparison of literal segments
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Appends a route (builder style)
    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Appends a route
    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Matches a path against all routes and returns the first match
    ///
    /// Returns `None` when no route matches; callers fall back to
    /// [`ControllerPathParser`].
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        self.routes.iter().find_map(|route| {
            route
                .matches_with_options(path, self.case_insensitive)
                .map(|params| RouteMatch {
                    controller: route.controller.clone(),
                    pattern: route.pattern.clone(),
                    params,
                })
        })
    }
}
