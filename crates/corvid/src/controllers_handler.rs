// File: src/controllers_handler.rs
// Purpose: Resolve the controller identifier for a request and run its chain

use crate::controller::{ControllerContext, Services};
use crate::data_collector::DataCollector;
use crate::processor::{ControllersProcessor, ControllersProcessorResult};
use crate::registry::ControllerRegistry;
use crate::request_context::RequestContext;
use crate::response::HttpResponse;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Runs the controllers for a request and reports the aggregated result
#[async_trait]
pub trait ControllersHandler: Send + Sync {
    async fn execute(
        &self,
        request: &mut RequestContext,
        data: &mut DataCollector,
        response: &mut HttpResponse,
    ) -> Result<ControllersProcessorResult>;
}

/// Default handler: route lookup, path fallback, error controllers
///
/// When the chain ends in 401, 403 or 404 and controllers are bound to that
/// status, the page data is reset and those controllers run instead. If they
/// complete normally the page is built with the error status; if they end in
/// a terminal result of their own, that result wins.
pub struct ControllersRequestHandler {
    processor: ControllersProcessor,
    services: Services,
}

impl ControllersRequestHandler {
    pub fn new(registry: Arc<ControllerRegistry>, services: Services) -> Self {
        Self {
            processor: ControllersProcessor::new(registry),
            services,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }
}

#[async_trait]
impl ControllersHandler for ControllersRequestHandler {
    async fn execute(
        &self,
        request: &mut RequestContext,
        data: &mut DataCollector,
        response: &mut HttpResponse,
    ) -> Result<ControllersProcessorResult> {
        let (id, params) = self.processor.registry().resolve(&request.path);
        request.route_params = params;
        tracing::debug!(path = %request.path, controller = %id, "resolved controller");

        let request: &RequestContext = request;
        let mut ctx = ControllerContext::new(request, data, response, &self.services);
        let result = self.processor.process(&id, &mut ctx).await?;

        let Some(error) = result.http_error() else {
            return Ok(result);
        };

        ctx.data.clear();
        match self.processor.process_http_error(error, &mut ctx).await? {
            Some(ControllersProcessorResult::Ok) => {
                ctx.response.set_status(error.status());
                Ok(ControllersProcessorResult::Ok)
            }
            Some(terminal) => Ok(terminal),
            None => Ok(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::controller::{Controller, ControllerResponse};
    use crate::data_collector::MAIN_CONTENT;
    use crate::registry::{ControllerEntry, RegistryBuilder};
    use crate::template::MemoryTemplateFactory;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    #[derive(Clone)]
    struct Fixed(&'static str, ControllerResponse);

    #[async_trait]
    impl Controller for Fixed {
        async fn invoke(&mut self, ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
            ctx.data.append(MAIN_CONTENT, self.0);
            Ok(self.1.clone())
        }
    }

    fn entry(text: &'static str, response: ControllerResponse) -> ControllerEntry {
        let controller = Fixed(text, response);
        ControllerEntry::new(text, move || controller.clone())
    }

    /// Echoes the `id` route parameter
    struct Echo;

    #[async_trait]
    impl Controller for Echo {
        async fn invoke(&mut self, ctx: &mut ControllerContext<'_>) -> Result<ControllerResponse> {
            let id = ctx.param("id").unwrap_or("none").to_string();
            Ok(ControllerResponse::tpl(id))
        }
    }

    fn handler(builder: RegistryBuilder) -> ControllersRequestHandler {
        let services = Services::new(Arc::new(MemoryTemplateFactory::new()), SiteConfig::default());
        ControllersRequestHandler::new(Arc::new(builder.build().unwrap()), services)
    }

    async fn execute(
        handler: &ControllersRequestHandler,
        path: &str,
    ) -> (ControllersProcessorResult, DataCollector, HttpResponse) {
        let mut request = RequestContext::get(path);
        let mut data = DataCollector::new();
        let mut response = HttpResponse::new();
        let result = handler
            .execute(&mut request, &mut data, &mut response)
            .await
            .unwrap();
        (result, data, response)
    }

    #[tokio::test]
    async fn test_route_params_reach_controller() {
        let handler = handler(
            RegistryBuilder::new()
                .controller("users", ControllerEntry::new("Echo", || Echo))
                .route("/users/{id}", "users"),
        );

        let (result, data, _) = execute(&handler, "/users/42").await;
        assert_eq!(result, ControllersProcessorResult::Ok);
        assert_eq!(data.get(MAIN_CONTENT), Some("42"));
    }

    #[tokio::test]
    async fn test_path_fallback() {
        let handler = handler(
            RegistryBuilder::new().controller("about", entry("about", ControllerResponse::Continue)),
        );
        let (result, data, _) = execute(&handler, "/about/").await;
        assert_eq!(result, ControllersProcessorResult::Ok);
        assert_eq!(data.get(MAIN_CONTENT), Some("about"));
    }

    #[tokio::test]
    async fn test_unbound_error_is_returned() {
        let handler = handler(RegistryBuilder::new());
        let (result, _, response) = execute(&handler, "/nowhere").await;
        assert_eq!(result, ControllersProcessorResult::Http404);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bound_error_builds_page_with_status() {
        let handler = handler(
            RegistryBuilder::new()
                .controller("secret", entry("secret;", ControllerResponse::Http403))
                .controller("denied", entry("denied;", ControllerResponse::Continue))
                .http_error(StatusCode::FORBIDDEN, "denied"),
        );

        let (result, data, response) = execute(&handler, "/secret").await;
        assert_eq!(result, ControllersProcessorResult::Ok);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        // page data from the failed chain is discarded
        assert_eq!(data.get(MAIN_CONTENT), Some("denied;"));
    }

    #[tokio::test]
    async fn test_error_chain_terminal_result_is_returned() {
        let handler = handler(
            RegistryBuilder::new()
                .controller(
                    "not-found",
                    entry("nf;", ControllerResponse::redirect("/")),
                )
                .http_error(StatusCode::NOT_FOUND, "not-found"),
        );

        let (result, _, response) = execute(&handler, "/missing").await;
        assert_eq!(
            result,
            ControllersProcessorResult::Redirect(crate::redirect::RedirectTarget::url("/"))
        );
        assert_eq!(response.status(), StatusCode::OK);
    }
}
