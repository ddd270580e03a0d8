// File: src/controller.rs
// Purpose: The controller contract and the per-request context controllers work with

use crate::config::Config;
use crate::config::SiteConfig;
use crate::data_collector::DataCollector;
use crate::model::{Model, ModelBindingError, ModelHandler};
use crate::redirect::RedirectTarget;
use crate::request_context::RequestContext;
use crate::response::HttpResponse;
use crate::string_table::{MapStringTable, StringTable};
use crate::template::{FileTemplateFactory, TemplateFactory};
use anyhow::Result;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// A unit of request logic
///
/// A fresh instance is created for every request that reaches it.
#[async_trait]
pub trait Controller: Send {
    async fn invoke(&mut self, ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse>;
}

/// What a controller asks the pipeline to do next
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerResponse {
    /// Nothing to contribute; keep going
    Continue,
    /// Append `content` to the main content and set the page title
    Tpl { content: String, title: Option<String> },
    /// Like `Tpl`, with the content loaded from a named template
    StaticTpl {
        template: String,
        title: Option<String>,
    },
    /// Write a raw body and stop
    Content { body: String, content_type: String },
    /// Write a JSON body and stop
    Json(JsonValue),
    /// Send a file download and stop
    File {
        name: String,
        content_type: String,
        data: Vec<u8>,
    },
    Http400,
    Http401,
    Http403,
    Http404,
    Redirect(RedirectTarget),
}

impl ControllerResponse {
    pub fn tpl(content: impl Into<String>) -> Self {
        ControllerResponse::Tpl {
            content: content.into(),
            title: None,
        }
    }

    pub fn tpl_with_title(content: impl Into<String>, title: impl Into<String>) -> Self {
        ControllerResponse::Tpl {
            content: content.into(),
            title: Some(title.into()),
        }
    }

    pub fn static_tpl(template: impl Into<String>) -> Self {
        ControllerResponse::StaticTpl {
            template: template.into(),
            title: None,
        }
    }

    pub fn content(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        ControllerResponse::Content {
            body: body.into(),
            content_type: content_type.into(),
        }
    }

    pub fn redirect(url: impl Into<String>) -> Self {
        ControllerResponse::Redirect(RedirectTarget::url(url))
    }
}

/// HTTP error dispositions a controller can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpError {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
}

impl HttpError {
    pub fn status(self) -> StatusCode {
        match self {
            HttpError::BadRequest => StatusCode::BAD_REQUEST,
            HttpError::Unauthorized => StatusCode::UNAUTHORIZED,
            HttpError::Forbidden => StatusCode::FORBIDDEN,
            HttpError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::BAD_REQUEST => Some(HttpError::BadRequest),
            StatusCode::UNAUTHORIZED => Some(HttpError::Unauthorized),
            StatusCode::FORBIDDEN => Some(HttpError::Forbidden),
            StatusCode::NOT_FOUND => Some(HttpError::NotFound),
            _ => None,
        }
    }
}

/// Shared collaborators, built once at startup
#[derive(Clone)]
pub struct Services {
    pub templates: Arc<dyn TemplateFactory>,
    pub strings: Arc<dyn StringTable>,
    pub models: Arc<ModelHandler>,
    pub site: Arc<SiteConfig>,
}

impl Services {
    pub fn new(templates: Arc<dyn TemplateFactory>, site: SiteConfig) -> Self {
        Self {
            templates,
            strings: Arc::new(MapStringTable::default()),
            models: Arc::new(ModelHandler::default()),
            site: Arc::new(site),
        }
    }

    pub fn with_strings(mut self, strings: Arc<dyn StringTable>) -> Self {
        self.strings = strings;
        self
    }

    pub fn with_models(mut self, models: ModelHandler) -> Self {
        self.models = Arc::new(models);
        self
    }

    /// File templates and optional string table, as configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let site = &config.site;
        let templates = FileTemplateFactory::new(&site.templates_dir, &site.template_extension)
            .with_cache(site.cache_templates);

        let strings = match &site.strings_file {
            Some(path) => MapStringTable::load(path)?,
            None => MapStringTable::default(),
        };

        Ok(Self::new(Arc::new(templates), site.clone()).with_strings(Arc::new(strings)))
    }
}

/// Everything a controller can see and touch during one request
pub struct ControllerContext<'a> {
    pub request: &'a RequestContext,
    pub data: &'a mut DataCollector,
    pub response: &'a mut HttpResponse,
    pub services: &'a Services,
}

impl<'a> ControllerContext<'a> {
    pub fn new(
        request: &'a RequestContext,
        data: &'a mut DataCollector,
        response: &'a mut HttpResponse,
        services: &'a Services,
    ) -> Self {
        Self {
            request,
            data,
            response,
            services,
        }
    }

    /// Bind and validate a model from the request
    pub fn model<T: Model>(&self) -> Result<T, ModelBindingError> {
        self.services.models.process(self.request)
    }

    /// Localized string, or the key itself when undefined
    pub fn string(&self, key: &str) -> String {
        self.services.strings.get_or_key(key)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.param(name)
    }

    pub fn templates(&self) -> &dyn TemplateFactory {
        self.services.templates.as_ref()
    }
}
