// File: src/page.rs
// Purpose: Merge collected page data into the master template

use crate::data_collector::DataCollector;
use crate::page_data::PageDataSetter;
use crate::request_context::RequestContext;
use crate::response::{HttpResponse, HTML_CONTENT_TYPE};
use crate::template::TemplateFactory;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Builds the final page from the master template
#[derive(Clone)]
pub struct PageBuilder {
    templates: Arc<dyn TemplateFactory>,
    master: String,
}

impl PageBuilder {
    pub fn new(templates: Arc<dyn TemplateFactory>, master: impl Into<String>) -> Self {
        Self {
            templates,
            master: master.into(),
        }
    }

    /// Substitute every collected value into the master template
    pub fn build(&self, data: &DataCollector) -> Result<String> {
        let mut template = self
            .templates
            .load(&self.master)
            .with_context(|| format!("Failed to load master template '{}'", self.master))?;

        for (name, value) in data.iter() {
            template.set(name, value);
        }

        Ok(template.get())
    }
}

/// Turns collected page data into the response body
pub trait PageProcessor: Send + Sync {
    fn process(
        &self,
        request: &RequestContext,
        data: &mut DataCollector,
        response: &mut HttpResponse,
    ) -> Result<()>;
}

/// Writes the built page as HTML
///
/// Page data setters run first, in the order they were added.
#[derive(Clone)]
pub struct HtmlPageProcessor {
    builder: PageBuilder,
    setters: Vec<Arc<dyn PageDataSetter>>,
}

impl HtmlPageProcessor {
    pub fn new(builder: PageBuilder) -> Self {
        Self {
            builder,
            setters: Vec::new(),
        }
    }

    pub fn with_setters(
        mut self,
        setters: impl IntoIterator<Item = Arc<dyn PageDataSetter>>,
    ) -> Self {
        self.setters.extend(setters);
        self
    }
}

impl PageProcessor for HtmlPageProcessor {
    fn process(
        &self,
        request: &RequestContext,
        data: &mut DataCollector,
        response: &mut HttpResponse,
    ) -> Result<()> {
        for setter in &self.setters {
            setter.set(request, data);
        }

        let page = self.builder.build(data)?;
        tracing::debug!(bytes = page.len(), "page built");
        response.write(HTML_CONTENT_TYPE, page)
    }
}
