use super::{CatalogError, FixtureSource};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-memory implementation of FixtureSource
///
/// Useful for tests that need a fixture tree without touching disk.
#[derive(Debug, Default)]
pub struct InMemorySource {
    files: RwLock<BTreeMap<String, Bytes>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a fixture
    pub fn insert(&self, path: impl Into<String>, contents: impl Into<Bytes>) {
        self.files.write().insert(path.into(), contents.into());
    }

    /// Builder form of `insert`
    pub fn with(self, path: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl FixtureSource for InMemorySource {
    fn read(&self, path: &str) -> Result<Bytes, CatalogError> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(path.to_string()))
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, CatalogError> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let files = self.files.read();
        Ok(files
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|name| !name.contains('/'))
            .map(str::to_string)
            .collect())
    }

    fn remove(&self, path: &str) -> Result<(), CatalogError> {
        self.files
            .write()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| CatalogError::NotFound(path.to_string()))
    }
}
