// File: src/request_context.rs
// Purpose: Read-only request data handed to controllers and model binders

use axum::http::{header, HeaderMap, Method};
use corvid_router::Params;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::time::Instant;

/// Authenticated user, supplied by the transport's authentication layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// One request as seen by the pipeline
#[derive(Clone)]
pub struct RequestContext {
    pub method: Method,

    /// Raw (still percent-encoded) request path
    pub path: String,

    pub query: QueryParams,

    /// Body fields of form and JSON posts
    pub form: FormData,

    pub headers: HeaderMap,

    /// Parameters captured by the matched route, empty for convention-addressed controllers
    pub route_params: Params,

    /// Current user, `None` for anonymous requests
    pub user: Option<Principal>,

    /// When the transport handed the request over
    pub received_at: Instant,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("user", &self.user.as_ref().map(|u| u.name.as_str()))
            .finish()
    }
}

impl RequestContext {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        query: QueryParams,
        form: FormData,
        headers: HeaderMap,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            query,
            form,
            headers,
            route_params: Params::new(),
            user: None,
            received_at: Instant::now(),
        }
    }

    /// Shorthand for a GET request without query, form or headers
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(
            Method::GET,
            path,
            QueryParams::default(),
            FormData::default(),
            HeaderMap::new(),
        )
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_user(mut self, user: Principal) -> Self {
        self.user = Some(user);
        self
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Media type of the body, without parameters (e.g. "application/json")
    pub fn content_type(&self) -> Option<&str> {
        let value = self.headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
        value.split(';').next().map(str::trim)
    }

    /// Route parameter captured for `name`
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route_params.get(name)
    }
}

/// Decodes an `application/x-www-form-urlencoded` string into pairs
///
/// `+` is decoded as a space. Pairs without `=` get an empty value.
pub fn parse_urlencoded(raw: &str) -> HashMap<String, String> {
    fn decode(part: &str) -> String {
        let spaced = part.replace('+', " ");
        urlencoding::decode(&spaced)
            .map(|s| s.into_owned())
            .unwrap_or(spaced)
    }

    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode(key), decode(value)),
            None => (decode(pair), String::new()),
        })
        .collect()
}

/// Decoded query string
#[derive(Debug, Clone, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    /// Parse a raw query string (without the leading `?`)
    pub fn parse(raw: &str) -> Self {
        Self(parse_urlencoded(raw))
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }
}

/// Body of a form or JSON post
///
/// Text fields are trimmed. A JSON body keeps its original document for
/// binders that want the structure, alongside a flattened field view.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    raw_json: Option<JsonValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(k, v)| {
                let trimmed = v.trim().to_string();
                (k, trimmed)
            })
            .collect();

        Self {
            fields,
            raw_json: None,
        }
    }

    pub fn from_urlencoded(body: &str) -> Self {
        Self::from_fields(parse_urlencoded(body))
    }

    /// Top-level string members become fields; other members keep their JSON text
    pub fn from_json(json: JsonValue) -> Self {
        let fields = match &json {
            JsonValue::Object(map) => map
                .iter()
                .map(|(key, value)| {
                    let text = match value.as_str() {
                        Some(s) => s.trim().to_string(),
                        None => value.to_string(),
                    };
                    (key.clone(), text)
                })
                .collect(),
            _ => HashMap::new(),
        };

        Self {
            fields,
            raw_json: Some(json),
        }
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.fields.get(key)
    }

    pub fn json(&self) -> Option<&JsonValue> {
        self.raw_json.as_ref()
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.raw_json.is_none()
    }
}
