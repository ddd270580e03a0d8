// File: src/request_handler.rs
// Purpose: Top-level orchestration of one request through the pipeline

use crate::controller::Services;
use crate::controllers_handler::{ControllersHandler, ControllersRequestHandler};
use crate::data_collector::DataCollector;
use crate::page::{HtmlPageProcessor, PageBuilder, PageProcessor};
use crate::page_data::default_setters;
use crate::processor::ControllersProcessorResult;
use crate::redirect::{DefaultRedirector, Redirector};
use crate::registry::ControllerRegistry;
use crate::request_context::RequestContext;
use crate::response::HttpResponse;
use anyhow::Result;
use axum::http::StatusCode;
use std::sync::Arc;

/// Runs the controllers, then turns their result into exactly one response
#[derive(Clone)]
pub struct RequestHandler {
    controllers: Arc<dyn ControllersHandler>,
    pages: Arc<dyn PageProcessor>,
    redirector: Arc<dyn Redirector>,
}

impl RequestHandler {
    pub fn new(
        controllers: Arc<dyn ControllersHandler>,
        pages: Arc<dyn PageProcessor>,
        redirector: Arc<dyn Redirector>,
    ) -> Self {
        Self {
            controllers,
            pages,
            redirector,
        }
    }

    /// Standard pipeline: HTML master page with site variables and `303` redirects
    pub fn with_defaults(registry: Arc<ControllerRegistry>, services: Services) -> Self {
        let builder = PageBuilder::new(
            services.templates.clone(),
            services.site.master_template.clone(),
        );
        let pages = HtmlPageProcessor::new(builder).with_setters(default_setters(
            services.strings.clone(),
            services.site.clone(),
        ));
        let redirector = DefaultRedirector::new(services.site.default_page.clone());

        Self::new(
            Arc::new(ControllersRequestHandler::new(registry, services)),
            Arc::new(pages),
            Arc::new(redirector),
        )
    }

    pub async fn process_request(&self, mut request: RequestContext) -> Result<HttpResponse> {
        let mut data = DataCollector::new();
        let mut response = HttpResponse::new();

        let result = self
            .controllers
            .execute(&mut request, &mut data, &mut response)
            .await?;

        tracing::debug!(path = %request.path, result = ?result, "controllers finished");

        match result {
            ControllersProcessorResult::RawOutput => {}
            ControllersProcessorResult::Http400 => response.set_status(StatusCode::BAD_REQUEST),
            ControllersProcessorResult::Http401 => response.set_status(StatusCode::UNAUTHORIZED),
            ControllersProcessorResult::Http403 => response.set_status(StatusCode::FORBIDDEN),
            ControllersProcessorResult::Http404 => response.set_status(StatusCode::NOT_FOUND),
            ControllersProcessorResult::Redirect(target) => {
                self.redirector.redirect(&target, &request, &mut response)?;
            }
            ControllersProcessorResult::Ok => {
                self.pages.process(&request, &mut data, &mut response)?;
            }
        }

        Ok(response)
    }
}
