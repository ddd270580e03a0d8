// File: src/data_collector.rs
// Purpose: Ordered page data accumulated by controllers for the master template

use indexmap::IndexMap;

/// Placeholder receiving the page body produced by controllers
pub const MAIN_CONTENT: &str = "MainContent";

/// Placeholder receiving the page title
pub const TITLE: &str = "Title";

/// Master page data for one request
///
/// Keys keep the order in which they were first written. Later writes to
/// an existing key either replace ([`set`](Self::set)) or extend
/// ([`append`](Self::append)) its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataCollector {
    items: IndexMap<String, String>,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an item, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.items.insert(name.into(), value.into());
    }

    /// Set an item only if nothing was collected under `name` yet
    pub fn set_default(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.items.entry(name.into()).or_insert_with(|| value.into());
    }

    /// Append to an item, creating it if missing
    pub fn append(&mut self, name: impl Into<String>, value: &str) {
        self.items.entry(name.into()).or_default().push_str(value);
    }

    /// Set the page title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.set(TITLE, title);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.items.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drop everything collected so far
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
