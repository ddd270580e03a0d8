// File: src/redirect.rs
// Purpose: Resolve redirect targets and write the redirect onto the response

use crate::request_context::RequestContext;
use crate::response::HttpResponse;
use anyhow::Result;
use axum::http::{header, StatusCode};

/// Where a controller wants the client to go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// An explicit URL
    Url(String),
    /// The configured default page of the site
    DefaultPage,
    /// The page the client came from, falling back to the default page
    PreviousPage,
}

impl RedirectTarget {
    pub fn url(url: impl Into<String>) -> Self {
        RedirectTarget::Url(url.into())
    }
}

/// Writes a redirect for a target onto the response
pub trait Redirector: Send + Sync {
    fn redirect(
        &self,
        target: &RedirectTarget,
        request: &RequestContext,
        response: &mut HttpResponse,
    ) -> Result<()>;
}

/// `303 See Other` redirects; previous page taken from the `Referer` header
#[derive(Debug, Clone)]
pub struct DefaultRedirector {
    default_page: String,
}

impl DefaultRedirector {
    pub fn new(default_page: impl Into<String>) -> Self {
        Self {
            default_page: default_page.into(),
        }
    }

    pub fn resolve<'a>(&'a self, target: &'a RedirectTarget, request: &'a RequestContext) -> &'a str {
        match target {
            RedirectTarget::Url(url) => url.as_str(),
            RedirectTarget::DefaultPage => self.default_page.as_str(),
            RedirectTarget::PreviousPage => request
                .get_header("referer")
                .filter(|referer| !referer.is_empty())
                .unwrap_or(self.default_page.as_str()),
        }
    }
}

impl Redirector for DefaultRedirector {
    fn redirect(
        &self,
        target: &RedirectTarget,
        request: &RequestContext,
        response: &mut HttpResponse,
    ) -> Result<()> {
        let location = self.resolve(target, request);
        tracing::debug!(location, "redirecting");

        response.insert_header(header::LOCATION, location)?;
        response.set_status(StatusCode::SEE_OTHER);
        Ok(())
    }
}
