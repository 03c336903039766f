//! Fixture discovery by resource type.
//!
//! This module provides:
//! - `FixtureSource`: the storage collaborator holding canned JSON bodies
//! - `DirectorySource` / `InMemorySource`: filesystem and in-memory sources
//! - `FixtureCatalog`: identifier discovery, snapshot lookup and parsing
//!
//! Fixtures live at `<resource>/<id>[.<snapshot>].json`. The catalog never
//! caches: every call reflects the current contents of the source.

mod memory;
mod source;

pub use memory::InMemorySource;
pub use source::{DirectorySource, FixtureSource};

use crate::config::ResourceConfig;
use bytes::Bytes;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error};

const FIXTURE_EXTENSION: &str = ".json";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Fixture not found: {0}")]
    NotFound(String),
    #[error("Fixture {path} is not valid JSON: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to access fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Discovers records and their lifecycle snapshots
#[derive(Clone)]
pub struct FixtureCatalog {
    source: Arc<dyn FixtureSource>,
}

impl FixtureCatalog {
    pub fn new(source: Arc<dyn FixtureSource>) -> Self {
        Self { source }
    }

    /// Identifiers available for a resource type.
    ///
    /// With `include_lifecycle_suffix` each snapshot is returned as its
    /// compound name (`12.converting`); without it, only base identifiers.
    /// The resource's sentinel identifier is never listed.
    pub fn list_identifiers(
        &self,
        resource: &ResourceConfig,
        include_lifecycle_suffix: bool,
    ) -> Result<BTreeSet<String>, CatalogError> {
        let names = self.source.list(&resource.name)?;
        let identifiers: BTreeSet<String> = names
            .iter()
            .filter_map(|file| file.strip_suffix(FIXTURE_EXTENSION))
            .filter(|compound| !compound.is_empty())
            .filter(|compound| !resource.is_sentinel(resource.base_identifier(compound)))
            .map(|compound| {
                if include_lifecycle_suffix {
                    compound.to_string()
                } else {
                    resource.base_identifier(compound).to_string()
                }
            })
            .collect();

        debug!(
            "Discovered {} {} in {}",
            identifiers.len(),
            if include_lifecycle_suffix {
                "snapshots"
            } else {
                "identifiers"
            },
            resource.name
        );
        Ok(identifiers)
    }

    /// Raw JSON for a compound name such as `12.converting` or `png`
    pub fn fetch(&self, resource: &ResourceConfig, compound: &str) -> Result<Bytes, CatalogError> {
        self.source.read(&fixture_path(&resource.name, compound))
    }

    /// Parsed JSON for a compound name
    pub fn parse(&self, resource: &ResourceConfig, compound: &str) -> Result<Value, CatalogError> {
        let path = fixture_path(&resource.name, compound);
        let bytes = self.source.read(&path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Fixture {} is corrupt: {}", path, e);
            CatalogError::Corrupt { path, source: e }
        })
    }

    /// Whether any snapshot exists for `id`
    pub fn exists(&self, resource: &ResourceConfig, id: &str) -> Result<bool, CatalogError> {
        Ok(self.list_identifiers(resource, false)?.contains(id))
    }

    /// Read any file below the fixture root (error bodies, binary content)
    pub fn read_raw(&self, path: &str) -> Result<Bytes, CatalogError> {
        self.source.read(path)
    }

    /// Delete every stored snapshot of `id`, returning how many were removed.
    ///
    /// Meant for test setup and teardown, not request handling.
    pub fn remove(&self, resource: &ResourceConfig, id: &str) -> Result<usize, CatalogError> {
        let snapshots: Vec<String> = self
            .list_identifiers(resource, true)?
            .into_iter()
            .filter(|compound| resource.base_identifier(compound) == id)
            .collect();

        for compound in &snapshots {
            self.source.remove(&fixture_path(&resource.name, compound))?;
        }
        debug!("Removed {} snapshots of {}/{}", snapshots.len(), resource.name, id);
        Ok(snapshots.len())
    }
}

fn fixture_path(resource: &str, compound: &str) -> String {
    format!("{resource}/{compound}{FIXTURE_EXTENSION}")
}
