//! Process-lifetime schema cache.
//!
//! Subgraph schemas are immutable per deployment id, so entries are never
//! evicted or expired.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Cached schema forms for a single subgraph. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCacheEntry {
    pub text: Option<String>,
    pub json: Option<String>,
}

impl SchemaCacheEntry {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            json: None,
        }
    }

    /// The requested form, if present
    pub fn form(&self, as_text: bool) -> Option<&str> {
        if as_text {
            self.text.as_deref()
        } else {
            self.json.as_deref()
        }
    }

    fn merge(&mut self, incoming: SchemaCacheEntry) {
        if incoming.text.is_some() {
            self.text = incoming.text;
        }
        if incoming.json.is_some() {
            self.json = incoming.json;
        }
    }
}

/// Schema cache keyed by subgraph id.
///
/// Locks are only held for the duration of a map operation, never across an
/// `.await`.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<String, SchemaCacheEntry>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subgraph_id: &str) -> Option<SchemaCacheEntry> {
        self.entries.read().get(subgraph_id).cloned()
    }

    /// Merge a partial entry into the cache. Populated fields of `entry`
    /// replace existing ones; empty fields leave existing ones alone.
    pub fn put(&self, subgraph_id: impl Into<String>, entry: SchemaCacheEntry) {
        self.entries
            .write()
            .entry(subgraph_id.into())
            .or_default()
            .merge(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
