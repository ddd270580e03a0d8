// File: src/executor.rs
// Purpose: Run one controller and normalize what it returned

use crate::controller::{Controller, ControllerContext, ControllerResponse, HttpError};
use crate::redirect::RedirectTarget;
use anyhow::{Context, Result};
use axum::http::{header, StatusCode};

/// Normalized result of a single controller
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerOutcome {
    /// Page data (possibly) contributed; the chain goes on
    Continue,
    /// The response was written directly
    RawOutput,
    Http(HttpError),
    Redirect(RedirectTarget),
}

impl ControllerOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ControllerOutcome::Continue)
    }
}

/// Applies controller responses to the page data and response writer
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerExecutor;

impl ControllerExecutor {
    pub async fn execute(
        &self,
        controller: &mut dyn Controller,
        ctx: &mut ControllerContext<'_>,
    ) -> Result<ControllerOutcome> {
        let response = controller.invoke(ctx).await?;
        self.apply(response, ctx)
    }

    fn apply(
        &self,
        response: ControllerResponse,
        ctx: &mut ControllerContext<'_>,
    ) -> Result<ControllerOutcome> {
        let outcome = match response {
            ControllerResponse::Continue => ControllerOutcome::Continue,
            ControllerResponse::Tpl { content, title } => {
                Self::add_content(ctx, &content, title);
                ControllerOutcome::Continue
            }
            ControllerResponse::StaticTpl { template, title } => {
                let content = ctx
                    .services
                    .templates
                    .load(&template)
                    .with_context(|| format!("Failed to load static template '{}'", template))?
                    .get();
                Self::add_content(ctx, &content, title);
                ControllerOutcome::Continue
            }
            ControllerResponse::Content { body, content_type } => {
                ctx.response.set_status(StatusCode::OK);
                ctx.response.write(&content_type, body)?;
                ControllerOutcome::RawOutput
            }
            ControllerResponse::Json(value) => {
                ctx.response.set_status(StatusCode::OK);
                ctx.response
                    .write("application/json", serde_json::to_vec(&value)?)?;
                ControllerOutcome::RawOutput
            }
            ControllerResponse::File {
                name,
                content_type,
                data,
            } => {
                ctx.response.set_status(StatusCode::OK);
                let disposition = format!("attachment; filename=\"{}\"", name.replace('"', ""));
                ctx.response
                    .insert_header(header::CONTENT_DISPOSITION, &disposition)?;
                ctx.response.write(&content_type, data)?;
                ControllerOutcome::RawOutput
            }
            ControllerResponse::Http400 => ControllerOutcome::Http(HttpError::BadRequest),
            ControllerResponse::Http401 => ControllerOutcome::Http(HttpError::Unauthorized),
            ControllerResponse::Http403 => ControllerOutcome::Http(HttpError::Forbidden),
            ControllerResponse::Http404 => ControllerOutcome::Http(HttpError::NotFound),
            ControllerResponse::Redirect(target) => ControllerOutcome::Redirect(target),
        };
        Ok(outcome)
    }

    fn add_content(ctx: &mut ControllerContext<'_>, content: &str, title: Option<String>) {
        ctx.data.append(crate::data_collector::MAIN_CONTENT, content);
        if let Some(title) = title {
            ctx.data.set_title(title);
        }
    }
}
