// File: src/config.rs
// Purpose: Configuration parsing from corvid.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Page building and collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Master template name, resolved through the template factory
    #[serde(default = "default_master_template")]
    pub master_template: String,

    /// Directory containing template files
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// File extension of template files (without dot)
    #[serde(default = "default_template_extension")]
    pub template_extension: String,

    /// Keep loaded templates in memory
    #[serde(default = "default_true")]
    pub cache_templates: bool,

    /// Target of `RedirectTarget::DefaultPage`
    #[serde(default = "default_page")]
    pub default_page: String,

    /// Optional TOML file with localized strings (flat key = "value")
    #[serde(default)]
    pub strings_file: Option<PathBuf>,

    /// Absolute site URL exposed as `{SiteUrl}`; derived from `Host` when unset
    #[serde(default)]
    pub site_url: Option<String>,

    /// Use the `SiteTitle` string as the page title when controllers set none
    #[serde(default = "default_true")]
    pub automatic_site_title: bool,

    /// Expose string table items as `{StringTable.<Key>}` placeholders
    #[serde(default = "default_true")]
    pub string_table_placeholders: bool,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutingConfig {
    /// Compare literal route segments ignoring ASCII case (default: false)
    #[serde(default)]
    pub case_insensitive: bool,
}

// Default values
fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_master_template() -> String {
    "Master".to_string()
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_template_extension() -> String {
    "tpl".to_string()
}

fn default_page() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            master_template: default_master_template(),
            templates_dir: default_templates_dir(),
            template_extension: default_template_extension(),
            cache_templates: true,
            default_page: default_page(),
            strings_file: None,
            site_url: None,
            automatic_site_title: true,
            string_table_placeholders: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./corvid.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("corvid.toml")
    }
}
