// File: src/processor.rs
// Purpose: Build and run the controller chain for an identifier

use crate::controller::{ControllerContext, HttpError};
use crate::executor::{ControllerExecutor, ControllerOutcome};
use crate::redirect::RedirectTarget;
use crate::registry::{ControllerEntry, ControllerRegistry};
use anyhow::Result;
use corvid_router::ControllerId;
use std::sync::Arc;

/// Aggregated result of a controller chain
#[derive(Debug, Clone, PartialEq)]
pub enum ControllersProcessorResult {
    /// Every controller continued; a page should be built
    Ok,
    /// A controller wrote the response itself
    RawOutput,
    Http400,
    Http401,
    Http403,
    Http404,
    Redirect(RedirectTarget),
}

impl ControllersProcessorResult {
    pub fn http_error(&self) -> Option<HttpError> {
        match self {
            ControllersProcessorResult::Http400 => Some(HttpError::BadRequest),
            ControllersProcessorResult::Http401 => Some(HttpError::Unauthorized),
            ControllersProcessorResult::Http403 => Some(HttpError::Forbidden),
            ControllersProcessorResult::Http404 => Some(HttpError::NotFound),
            _ => None,
        }
    }
}

impl From<HttpError> for ControllersProcessorResult {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::BadRequest => ControllersProcessorResult::Http400,
            HttpError::Unauthorized => ControllersProcessorResult::Http401,
            HttpError::Forbidden => ControllersProcessorResult::Http403,
            HttpError::NotFound => ControllersProcessorResult::Http404,
        }
    }
}

/// Runs controller chains against the registry
#[derive(Debug, Clone)]
pub struct ControllersProcessor {
    registry: Arc<ControllerRegistry>,
    executor: ControllerExecutor,
}

impl ControllersProcessor {
    pub fn new(registry: Arc<ControllerRegistry>) -> Self {
        Self {
            registry,
            executor: ControllerExecutor,
        }
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// Run the controllers registered under `id`, merged with the globals
    ///
    /// An unknown identifier, or one with no controller accepting the
    /// request method, yields `Http404` without running anything.
    pub async fn process(
        &self,
        id: &ControllerId,
        ctx: &mut ControllerContext<'_>,
    ) -> Result<ControllersProcessorResult> {
        let Some(descriptor) = self.registry.descriptor(id) else {
            tracing::debug!(controller = %id, "no controllers registered");
            return Ok(ControllersProcessorResult::Http404);
        };

        let method = &ctx.request.method;
        let routed: Vec<&ControllerEntry> = descriptor
            .entries
            .iter()
            .filter(|entry| entry.accepts(method))
            .collect();

        if routed.is_empty() {
            tracing::debug!(controller = %id, %method, "no controller accepts method");
            return Ok(ControllersProcessorResult::Http404);
        }

        let chain = self.with_globals(routed, method);
        self.run_chain(&chain, ctx).await
    }

    /// Run the chain bound to an HTTP error, if any
    pub async fn process_http_error(
        &self,
        error: HttpError,
        ctx: &mut ControllerContext<'_>,
    ) -> Result<Option<ControllersProcessorResult>> {
        let Some(descriptor) = self.registry.error_descriptor(error) else {
            return Ok(None);
        };

        tracing::debug!(status = %error.status(), controller = %descriptor.id, "running error controllers");

        let chain = self.with_globals(descriptor.entries.iter().collect(), &ctx.request.method);
        self.run_chain(&chain, ctx).await.map(Some)
    }

    fn with_globals<'r>(
        &'r self,
        mut chain: Vec<&'r ControllerEntry>,
        method: &axum::http::Method,
    ) -> Vec<&'r ControllerEntry> {
        chain.extend(self.registry.globals().iter().filter(|entry| entry.accepts(method)));
        chain.sort_by_key(|entry| entry.sequence());
        chain
    }

    async fn run_chain(
        &self,
        chain: &[&ControllerEntry],
        ctx: &mut ControllerContext<'_>,
    ) -> Result<ControllersProcessorResult> {
        for entry in chain {
            if let Some(denied) = Self::check_security(entry, ctx) {
                tracing::debug!(controller = %entry.name, result = ?denied, "access denied");
                return Ok(denied);
            }

            tracing::debug!(controller = %entry.name, "executing controller");
            let mut controller = entry.create();
            let outcome = self.executor.execute(controller.as_mut(), ctx).await?;

            let result = match outcome {
                ControllerOutcome::Continue => continue,
                ControllerOutcome::RawOutput => ControllersProcessorResult::RawOutput,
                ControllerOutcome::Http(error) => error.into(),
                ControllerOutcome::Redirect(target) => ControllersProcessorResult::Redirect(target),
            };

            tracing::debug!(controller = %entry.name, result = ?result, "chain stopped");
            return Ok(result);
        }

        Ok(ControllersProcessorResult::Ok)
    }

    fn check_security(
        entry: &ControllerEntry,
        ctx: &ControllerContext<'_>,
    ) -> Option<ControllersProcessorResult> {
        let rule = entry.security()?;
        match &ctx.request.user {
            None => Some(ControllersProcessorResult::Http401),
            Some(user)
                if !rule.roles.is_empty() && !rule.roles.iter().any(|role| user.is_in_role(role)) =>
            {
                Some(ControllersProcessorResult::Http403)
            }
            Some(_) => None,
        }
    }
}
