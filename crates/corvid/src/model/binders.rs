// File: src/model/binders.rs
// Purpose: Strategies that pick the request data a model is bound from

use crate::request_context::RequestContext;
use axum::http::Method;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const APPLICATION_JSON: &str = "application/json";

/// Raw data selected by a binder
#[derive(Debug, Clone, PartialEq)]
pub enum BindingData {
    /// Flat text fields; deserialized according to the model's field types
    Fields(HashMap<String, String>),
    /// A structured body
    Json(JsonValue),
}

/// A binding strategy
///
/// Returns `None` when the request is not something this binder handles,
/// letting the next binder in the list try.
pub trait ModelBinder: Send + Sync {
    fn name(&self) -> &'static str;

    fn bind(&self, request: &RequestContext) -> Option<BindingData>;
}

/// Binds GET and HEAD requests from the query string
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryModelBinder;

impl ModelBinder for QueryModelBinder {
    fn name(&self) -> &'static str {
        "query"
    }

    fn bind(&self, request: &RequestContext) -> Option<BindingData> {
        if request.method == Method::GET || request.method == Method::HEAD {
            Some(BindingData::Fields(request.query.as_map().clone()))
        } else {
            None
        }
    }
}

/// Binds urlencoded form posts
#[derive(Debug, Clone, Copy, Default)]
pub struct FormModelBinder;

impl ModelBinder for FormModelBinder {
    fn name(&self) -> &'static str {
        "form"
    }

    fn bind(&self, request: &RequestContext) -> Option<BindingData> {
        match request.content_type() {
            Some(ct) if ct.eq_ignore_ascii_case(FORM_URLENCODED) => {
                Some(BindingData::Fields(request.form.as_map().clone()))
            }
            _ => None,
        }
    }
}

/// Binds JSON request bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelBinder;

impl ModelBinder for JsonModelBinder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn bind(&self, request: &RequestContext) -> Option<BindingData> {
        match request.content_type() {
            Some(ct) if ct.eq_ignore_ascii_case(APPLICATION_JSON) => Some(BindingData::Json(
                request.form.json().cloned().unwrap_or(JsonValue::Null),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request_context::{FormData, QueryParams};
    use axum::http::{header, HeaderMap, HeaderValue};
    use serde_json::json;

    fn post(content_type: &str, form: FormData) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap(),
        );
        RequestContext::new(Method::POST, "/save", QueryParams::default(), form, headers)
    }

    #[test]
    fn test_query_binder_only_handles_get_and_head() {
        let request = RequestContext::get("/list").with_query(QueryParams::parse("page=2"));
        match QueryModelBinder.bind(&request) {
            Some(BindingData::Fields(fields)) => assert_eq!(fields["page"], "2"),
            other => panic!("unexpected binding: {:?}", other),
        }

        let request = post(FORM_URLENCODED, FormData::new());
        assert!(QueryModelBinder.bind(&request).is_none());
    }

    #[test]
    fn test_form_binder_matches_content_type_with_charset() {
        let request = post(
            "application/x-www-form-urlencoded; charset=UTF-8",
            FormData::from_urlencoded("name=Ada"),
        );
        match FormModelBinder.bind(&request) {
            Some(BindingData::Fields(fields)) => assert_eq!(fields["name"], "Ada"),
            other => panic!("unexpected binding: {:?}", other),
        }
        assert!(JsonModelBinder.bind(&request).is_none());
    }

    #[test]
    fn test_json_binder() {
        let request = post(APPLICATION_JSON, FormData::from_json(json!({ "a": 1 })));
        assert_eq!(
            JsonModelBinder.bind(&request),
            Some(BindingData::Json(json!({ "a": 1 })))
        );
        assert!(FormModelBinder.bind(&request).is_none());
    }
}
