// File: src/string_table.rs
// Purpose: Localizable text lookup used by controllers

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Lookup of localized strings by key
pub trait StringTable: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key`, or the key itself when it is not defined
    fn get_or_key(&self, key: &str) -> String {
        self.get(key).unwrap_or_else(|| key.to_string())
    }

    /// Every key and value, for tables that can enumerate them
    fn entries(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// String table backed by a flat map
#[derive(Debug, Clone, Default)]
pub struct MapStringTable {
    items: HashMap<String, String>,
}

impl MapStringTable {
    pub fn new(items: HashMap<String, String>) -> Self {
        Self { items }
    }

    /// Load a flat TOML file of `key = "value"` pairs
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read string table: {:?}", path))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse string table: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let items: HashMap<String, String> = toml::from_str(content)?;
        Ok(Self::new(items))
    }

    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }
}

impl StringTable for MapStringTable {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.items
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml() {
        let table = MapStringTable::from_toml(
            r#"
            PageTitle404 = "Page not found"
            SiteTitle = "Corvid"
        "#,
        )
        .unwrap();
        assert_eq!(table.get("PageTitle404"), Some("Page not found".to_string()));
        assert_eq!(table.get("Nope"), None);
        assert_eq!(table.get_or_key("Nope"), "Nope");
    }

    #[test]
    fn test_entries() {
        let table = MapStringTable::default().with_item("SiteTitle", "Corvid");
        assert_eq!(
            table.entries(),
            vec![("SiteTitle".to_string(), "Corvid".to_string())]
        );
    }

    #[test]
    fn test_non_string_values_are_rejected() {
        assert!(MapStringTable::from_toml("Count = 3").is_err());
    }
}
