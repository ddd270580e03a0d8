// File: src/template.rs
// Purpose: Text templates with flat {placeholder} substitution and their loaders

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^{}\s]+)\}").expect("placeholder regex is valid")
});

/// A loaded template with pending substitutions
///
/// Values are substituted in a single pass when the template is rendered,
/// so a value that itself contains `{Name}` is inserted verbatim and never
/// expanded. Placeholders without a value are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    content: String,
    values: IndexMap<String, String>,
}

impl Template {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            values: IndexMap::new(),
        }
    }

    /// Set the value for a placeholder
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Raw template text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Render the template with all values set so far
    pub fn get(&self) -> String {
        PLACEHOLDER_REGEX
            .replace_all(&self.content, |caps: &regex::Captures| {
                self.values
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Loads templates by name
pub trait TemplateFactory: Send + Sync {
    fn load(&self, name: &str) -> Result<Template>;
}

/// Loads `<dir>/<name>.<extension>` files, optionally caching their text
pub struct FileTemplateFactory {
    dir: PathBuf,
    extension: String,
    cache_enabled: bool,
    cache: RwLock<HashMap<String, String>>,
}

impl FileTemplateFactory {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            cache_enabled: true,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let name = name.trim_start_matches('/');
        if self.extension.is_empty() {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{}.{}", name, self.extension))
        }
    }

    fn cached(&self, name: &str) -> Option<String> {
        self.cache.read().ok()?.get(name).cloned()
    }
}

impl TemplateFactory for FileTemplateFactory {
    fn load(&self, name: &str) -> Result<Template> {
        if self.cache_enabled {
            if let Some(content) = self.cached(name) {
                return Ok(Template::new(content));
            }
        }

        let path = self.path_for(name);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template: {:?}", path))?;

        if self.cache_enabled {
            if let Ok(mut cache) = self.cache.write() {
                cache.insert(name.to_string(), content.clone());
            }
        }

        Ok(Template::new(content))
    }
}

/// Templates registered in memory, for tests and embedded sites
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateFactory {
    templates: HashMap<String, String>,
}

impl MemoryTemplateFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.templates.insert(name.into(), content.into());
        self
    }
}

impl TemplateFactory for MemoryTemplateFactory {
    fn load(&self, name: &str) -> Result<Template> {
        self.templates
            .get(name)
            .map(|content| Template::new(content.clone()))
            .ok_or_else(|| anyhow!("Template not found: {}", name))
    }
}
