// File: src/registry.rs
// Purpose: Startup-time registration of routes, controllers and error bindings

use crate::controller::{Controller, HttpError};
use axum::http::{Method, StatusCode};
use corvid_router::{
    ControllerId, ControllerPathParser, Params, PatternError, Route, RouteMatcher,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Creates a fresh controller instance per request
///
/// Implemented for any `Fn() -> C`, so a registration is usually just
/// `|| MyController` or `MyController::default`.
pub trait ControllerFactory: Send + Sync {
    fn create(&self) -> Box<dyn Controller>;
}

impl<F, C> ControllerFactory for F
where
    F: Fn() -> C + Send + Sync,
    C: Controller + 'static,
{
    fn create(&self) -> Box<dyn Controller> {
        Box::new(self())
    }
}

/// Access requirement checked before a controller runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityRule {
    /// Accepted roles; empty means any authenticated user
    pub roles: Vec<String>,
}

impl SecurityRule {
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// One controller registered under an identifier (or globally)
#[derive(Clone)]
pub struct ControllerEntry {
    pub name: String,
    factory: Arc<dyn ControllerFactory>,
    methods: Option<Vec<Method>>,
    security: Option<SecurityRule>,
    sequence: usize,
}

impl fmt::Debug for ControllerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerEntry")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .field("security", &self.security)
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl ControllerEntry {
    pub fn new(name: impl Into<String>, factory: impl ControllerFactory + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
            methods: None,
            security: None,
            sequence: 0,
        }
    }

    /// Restrict the entry to these HTTP methods
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    pub fn secured(mut self, rule: SecurityRule) -> Self {
        self.security = Some(rule);
        self
    }

    pub fn accepts(&self, method: &Method) -> bool {
        match &self.methods {
            Some(methods) => methods.contains(method),
            None => true,
        }
    }

    pub fn security(&self) -> Option<&SecurityRule> {
        self.security.as_ref()
    }

    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn create(&self) -> Box<dyn Controller> {
        self.factory.create()
    }
}

/// All controllers registered under one logical identifier
#[derive(Debug, Clone)]
pub struct ControllerDescriptor {
    pub id: ControllerId,
    pub entries: Vec<ControllerEntry>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("route '{pattern}' refers to unregistered controller '{controller}'")]
    UnknownController {
        pattern: String,
        controller: ControllerId,
    },

    #[error("HTTP {status} is bound to unregistered controller '{controller}'")]
    UnknownErrorController {
        status: StatusCode,
        controller: ControllerId,
    },

    #[error("route '{pattern}' refers to error controller '{controller}'")]
    RouteToErrorController {
        pattern: String,
        controller: ControllerId,
    },

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("HTTP {0} is bound more than once")]
    DuplicateErrorBinding(StatusCode),

    #[error("HTTP {0} cannot be bound to a controller (expected 401, 403 or 404)")]
    UnsupportedErrorStatus(StatusCode),
}

/// Collects registrations; validated and frozen by [`RegistryBuilder::build`]
#[derive(Default)]
pub struct RegistryBuilder {
    routes: Vec<(String, ControllerId)>,
    descriptors: HashMap<ControllerId, Vec<ControllerEntry>>,
    globals: Vec<ControllerEntry>,
    error_bindings: Vec<(StatusCode, ControllerId)>,
    case_insensitive: bool,
    sequence: usize,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a route pattern to a controller identifier
    pub fn route(mut self, pattern: impl Into<String>, id: impl Into<ControllerId>) -> Self {
        self.routes.push((pattern.into(), id.into()));
        self
    }

    /// Register a controller under an identifier
    pub fn controller(mut self, id: impl Into<ControllerId>, entry: ControllerEntry) -> Self {
        let entry = self.sequenced(entry);
        self.descriptors.entry(id.into()).or_default().push(entry);
        self
    }

    /// Register a controller that runs alongside every page
    pub fn global(mut self, entry: ControllerEntry) -> Self {
        let entry = self.sequenced(entry);
        self.globals.push(entry);
        self
    }

    /// Bind 401, 403 or 404 to the controllers registered under `id`
    pub fn http_error(mut self, status: StatusCode, id: impl Into<ControllerId>) -> Self {
        self.error_bindings.push((status, id.into()));
        self
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    fn sequenced(&mut self, mut entry: ControllerEntry) -> ControllerEntry {
        entry.sequence = self.sequence;
        self.sequence += 1;
        entry
    }

    /// Validate the registrations and freeze them
    ///
    /// Controllers bound to an error status leave the routable table: they
    /// only run through their binding, never by their own path.
    pub fn build(self) -> Result<ControllerRegistry, RegistryError> {
        let case_insensitive = self.case_insensitive;
        let normalize = |id: ControllerId| {
            if case_insensitive {
                ControllerId::new(id.as_str().to_lowercase())
            } else {
                id
            }
        };

        let mut routable: HashMap<ControllerId, Vec<ControllerEntry>> = HashMap::new();
        for (id, entries) in self.descriptors {
            routable.entry(normalize(id)).or_default().extend(entries);
        }
        for entries in routable.values_mut() {
            entries.sort_by_key(ControllerEntry::sequence);
        }

        let mut bound: Vec<(HttpError, ControllerId)> = Vec::new();
        for (status, id) in self.error_bindings {
            let error = match HttpError::from_status(status) {
                Some(HttpError::BadRequest) | None => {
                    return Err(RegistryError::UnsupportedErrorStatus(status))
                }
                Some(error) => error,
            };
            let id = normalize(id);
            if !routable.contains_key(&id) {
                return Err(RegistryError::UnknownErrorController {
                    status,
                    controller: id,
                });
            }
            if bound.iter().any(|(e, _)| *e == error) {
                return Err(RegistryError::DuplicateErrorBinding(status));
            }
            bound.push((error, id));
        }

        let mut matcher = RouteMatcher::new().with_case_insensitive(case_insensitive);
        for (pattern, id) in self.routes {
            let id = normalize(id);
            if bound.iter().any(|(_, bound_id)| *bound_id == id) {
                return Err(RegistryError::RouteToErrorController {
                    pattern,
                    controller: id,
                });
            }
            if !routable.contains_key(&id) {
                return Err(RegistryError::UnknownController {
                    pattern,
                    controller: id,
                });
            }
            matcher.push(Route::new(pattern, id)?);
        }

        let mut errors = HashMap::new();
        for (error, id) in &bound {
            if let Some(entries) = routable.get(id) {
                let descriptor = ControllerDescriptor {
                    id: id.clone(),
                    entries: entries.clone(),
                };
                errors.insert(*error, descriptor);
            }
        }
        for (_, id) in &bound {
            routable.remove(id);
        }

        let descriptors = routable
            .into_iter()
            .map(|(id, entries)| {
                let descriptor = ControllerDescriptor {
                    id: id.clone(),
                    entries,
                };
                (id, descriptor)
            })
            .collect();

        Ok(ControllerRegistry {
            descriptors,
            globals: self.globals,
            errors,
            matcher,
            parser: ControllerPathParser::new().with_lowercase(case_insensitive),
        })
    }
}

/// Immutable controller table shared by every request
#[derive(Debug)]
pub struct ControllerRegistry {
    descriptors: HashMap<ControllerId, ControllerDescriptor>,
    globals: Vec<ControllerEntry>,
    errors: HashMap<HttpError, ControllerDescriptor>,
    matcher: RouteMatcher,
    parser: ControllerPathParser,
}

impl ControllerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn descriptor(&self, id: &ControllerId) -> Option<&ControllerDescriptor> {
        self.descriptors.get(id)
    }

    pub fn globals(&self) -> &[ControllerEntry] {
        &self.globals
    }

    pub fn error_descriptor(&self, error: HttpError) -> Option<&ControllerDescriptor> {
        self.errors.get(&error)
    }

    pub fn matcher(&self) -> &RouteMatcher {
        &self.matcher
    }

    /// Controller identifier and route parameters for a request path
    ///
    /// Explicit routes win; otherwise the identifier is derived from the
    /// path with no parameters.
    pub fn resolve(&self, path: &str) -> (ControllerId, Params) {
        match self.matcher.match_path(path) {
            Some(found) => (found.controller, found.params),
            None => (self.parser.parse(path), Params::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerContext, ControllerResponse};
    use anyhow::Result;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Controller for Noop {
        async fn invoke(&mut self, _ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
            Ok(ControllerResponse::Continue)
        }
    }

    fn entry(name: &str) -> ControllerEntry {
        ControllerEntry::new(name, || Noop)
    }

    #[test]
    fn test_resolve_prefers_routes_then_path() {
        let registry = RegistryBuilder::new()
            .controller("users", entry("UserDetails"))
            .route("/users/{id}", "users")
            .build()
            .unwrap();

        let (id, params) = registry.resolve("/users/42");
        assert_eq!(id.as_str(), "users");
        assert_eq!(params.get("id"), Some("42"));

        let (id, params) = registry.resolve("/admin/settings");
        assert_eq!(id.as_str(), "admin/settings");
        assert!(params.is_empty());

        assert_eq!(registry.resolve("/").0.as_str(), "index");
    }

    #[test]
    fn test_sequence_follows_registration_order() {
        let registry = RegistryBuilder::new()
            .global(entry("NavBar"))
            .controller("index", entry("Home"))
            .global(entry("Footer"))
            .build()
            .unwrap();

        let descriptor = registry.descriptor(&"index".into()).unwrap();
        assert_eq!(descriptor.entries[0].sequence(), 1);
        let globals: Vec<usize> = registry.globals().iter().map(|e| e.sequence()).collect();
        assert_eq!(globals, vec![0, 2]);
    }

    #[test]
    fn test_route_to_unknown_controller_is_rejected() {
        let err = RegistryBuilder::new()
            .route("/users/{id}", "users")
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownController { .. }));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = RegistryBuilder::new()
            .controller("users", entry("Users"))
            .route("/users/{id}/{id}", "users")
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::Pattern(_)));
    }

    #[test]
    fn test_error_bindings() {
        let registry = RegistryBuilder::new()
            .controller("not-found", entry("NotFound"))
            .http_error(StatusCode::NOT_FOUND, "not-found")
            .build()
            .unwrap();
        assert!(registry.error_descriptor(HttpError::NotFound).is_some());
        assert!(registry.error_descriptor(HttpError::Forbidden).is_none());

        let err = RegistryBuilder::new()
            .controller("not-found", entry("NotFound"))
            .http_error(StatusCode::NOT_FOUND, "not-found")
            .http_error(StatusCode::NOT_FOUND, "not-found")
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateErrorBinding(_)));

        let err = RegistryBuilder::new()
            .controller("oops", entry("Oops"))
            .http_error(StatusCode::INTERNAL_SERVER_ERROR, "oops")
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedErrorStatus(_)));
    }

    #[test]
    fn test_error_controllers_are_not_routable() {
        let registry = RegistryBuilder::new()
            .controller("not-found", entry("NotFound"))
            .http_error(StatusCode::NOT_FOUND, "not-found")
            .http_error(StatusCode::FORBIDDEN, "not-found")
            .build()
            .unwrap();
        assert!(registry.descriptor(&"not-found".into()).is_none());
        assert!(registry.error_descriptor(HttpError::NotFound).is_some());
        assert!(registry.error_descriptor(HttpError::Forbidden).is_some());

        let err = RegistryBuilder::new()
            .controller("not-found", entry("NotFound"))
            .route("/missing", "not-found")
            .http_error(StatusCode::NOT_FOUND, "not-found")
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::RouteToErrorController { .. }));
    }

    #[test]
    fn test_case_insensitive_ids_are_folded() {
        let registry = RegistryBuilder::new()
            .case_insensitive(true)
            .controller("About", entry("About"))
            .controller("about", entry("AboutFooter"))
            .controller("Users", entry("Users"))
            .route("/People/{id}", "Users")
            .build()
            .unwrap();

        let (id, _) = registry.resolve("/About");
        assert_eq!(id.as_str(), "about");
        let names: Vec<&str> = registry
            .descriptor(&id)
            .unwrap()
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["About", "AboutFooter"]);

        let (id, params) = registry.resolve("/people/7");
        assert!(registry.descriptor(&id).is_some());
        assert_eq!(params.get("id"), Some("7"));

        let exact = RegistryBuilder::new()
            .controller("About", entry("About"))
            .build()
            .unwrap();
        assert!(exact.descriptor(&exact.resolve("/About").0).is_some());
        assert!(exact.descriptor(&exact.resolve("/about").0).is_none());
    }

    #[test]
    fn test_method_filter() {
        let get_only = entry("Form").methods([Method::GET]);
        assert!(get_only.accepts(&Method::GET));
        assert!(!get_only.accepts(&Method::POST));
        assert!(entry("Any").accepts(&Method::DELETE));
    }
}
