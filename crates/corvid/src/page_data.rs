// File: src/page_data.rs
// Purpose: Site-wide page data filled in right before the master page is built

use crate::config::SiteConfig;
use crate::data_collector::{DataCollector, TITLE};
use crate::request_context::RequestContext;
use crate::string_table::StringTable;
use axum::http::header;
use std::sync::Arc;

pub const SITE_URL: &str = "SiteUrl";
pub const SITE_TITLE: &str = "SiteTitle";
pub const EXECUTION_TIME: &str = "ExecutionTime";

/// Prefix of placeholders backed by string table items
pub const STRING_TABLE_PREFIX: &str = "StringTable.";

/// Adds data to a page that controllers completed normally
///
/// Setters only fill gaps: values collected by controllers are never
/// overwritten.
pub trait PageDataSetter: Send + Sync {
    fn set(&self, request: &RequestContext, data: &mut DataCollector);
}

/// `{SiteUrl}`, `{SiteTitle}` and `{ExecutionTime}`, plus the default title
pub struct ContextVariablesSetter {
    strings: Arc<dyn StringTable>,
    site: Arc<SiteConfig>,
}

impl ContextVariablesSetter {
    pub fn new(strings: Arc<dyn StringTable>, site: Arc<SiteConfig>) -> Self {
        Self { strings, site }
    }

    /// Configured URL, else `<scheme>://<host>/` from the request headers
    fn site_url(&self, request: &RequestContext) -> Option<String> {
        if let Some(url) = &self.site.site_url {
            return Some(url.clone());
        }

        let host = request.get_header(header::HOST.as_str())?;
        let scheme = request.get_header("x-forwarded-proto").unwrap_or("http");
        Some(format!("{}://{}/", scheme, host))
    }
}

impl PageDataSetter for ContextVariablesSetter {
    fn set(&self, request: &RequestContext, data: &mut DataCollector) {
        if let Some(url) = self.site_url(request) {
            data.set_default(SITE_URL, url);
        }

        if let Some(title) = self.strings.get(SITE_TITLE) {
            if self.site.automatic_site_title {
                data.set_default(TITLE, title.clone());
            }
            data.set_default(SITE_TITLE, title);
        }

        let elapsed = request.received_at.elapsed();
        data.set_default(EXECUTION_TIME, format!("{}ms", elapsed.as_millis()));
    }
}

/// Every string table item as `{StringTable.<Key>}`
pub struct StringTableItemsSetter {
    strings: Arc<dyn StringTable>,
}

impl StringTableItemsSetter {
    pub fn new(strings: Arc<dyn StringTable>) -> Self {
        Self { strings }
    }
}

impl PageDataSetter for StringTableItemsSetter {
    fn set(&self, _request: &RequestContext, data: &mut DataCollector) {
        for (key, value) in self.strings.entries() {
            data.set_default(format!("{}{}", STRING_TABLE_PREFIX, key), value);
        }
    }
}

/// Setters enabled by the site configuration
pub fn default_setters(
    strings: Arc<dyn StringTable>,
    site: Arc<SiteConfig>,
) -> Vec<Arc<dyn PageDataSetter>> {
    let mut setters: Vec<Arc<dyn PageDataSetter>> = Vec::new();
    if site.string_table_placeholders {
        setters.push(Arc::new(StringTableItemsSetter::new(strings.clone())));
    }
    setters.push(Arc::new(ContextVariablesSetter::new(strings, site)));
    setters
}
