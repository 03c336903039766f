//! Configuration types for the mock server.

mod listen;
mod resource;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::index::RecordFilter;

pub use listen::ListenConfig;
pub use resource::{default_resources, Lifecycle, ProgressStages, ResourceConfig};

/// Snapshot shown in list responses when an index names none
pub const DEFAULT_INDEX_SNAPSHOT: &str = "initialising";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,

    /// Prefix of every API route
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Bearer token clients must present
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Root of the canned fixture tree
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,

    /// Size of the generated payload served for a sentinel file's content
    #[serde(default = "default_large_file_size_mb")]
    pub large_file_size_mb: usize,

    #[serde(default = "default_resources")]
    pub resources: Vec<ResourceConfig>,

    #[serde(default = "default_indexes")]
    pub indexes: Vec<IndexConfig>,
}

/// A list endpoint over one resource type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Route below the base path, e.g. `jobs/successful`
    pub path: String,
    pub resource: String,
    /// Snapshot substituted for lifecycle suffixes in the listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_snapshot: Option<String>,
    #[serde(default)]
    pub filter: RecordFilter,
}

impl IndexConfig {
    pub fn new(path: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            resource: resource.into(),
            index_snapshot: None,
            filter: RecordFilter::AlwaysTrue,
        }
    }

    pub fn with_snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.index_snapshot = Some(snapshot.into());
        self
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn index_snapshot(&self) -> &str {
        self.index_snapshot
            .as_deref()
            .unwrap_or(DEFAULT_INDEX_SNAPSHOT)
    }
}

fn default_base_path() -> String {
    "/v1".to_string()
}

fn default_api_key() -> String {
    "GiVUYsF4A8ssq93FR48H".to_string()
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("fixtures")
}

fn default_large_file_size_mb() -> usize {
    1
}

/// Upper bound for the generated sentinel payload
pub const MAX_LARGE_FILE_SIZE_MB: usize = 1024;

/// List endpoints served by the production mock
pub fn default_indexes() -> Vec<IndexConfig> {
    vec![
        IndexConfig::new("files", "files"),
        IndexConfig::new("formats", "formats"),
        IndexConfig::new("imports", "imports"),
        IndexConfig::new("jobs", "jobs"),
        IndexConfig::new("jobs/successful", "jobs")
            .with_snapshot("completed")
            .with_filter(RecordFilter::field_equals("status", "successful")),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            base_path: default_base_path(),
            api_key: default_api_key(),
            fixtures_dir: default_fixtures_dir(),
            large_file_size_mb: default_large_file_size_mb(),
            resources: default_resources(),
            indexes: default_indexes(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            anyhow::bail!("base_path must start with '/': '{}'", self.base_path);
        }

        if self.large_file_size_mb == 0 || self.large_file_size_mb > MAX_LARGE_FILE_SIZE_MB {
            anyhow::bail!(
                "large_file_size_mb must be between 1 and {}: {}",
                MAX_LARGE_FILE_SIZE_MB,
                self.large_file_size_mb
            );
        }

        let mut names = HashSet::new();
        for resource in &self.resources {
            if !names.insert(resource.name.as_str()) {
                anyhow::bail!("Resource '{}' is defined more than once", resource.name);
            }
            if resource.ordering.field.is_empty() {
                anyhow::bail!("Resource '{}' has an empty ordering field", resource.name);
            }
            if let Lifecycle::Progressive { stages, cancelled } = &resource.lifecycle {
                let mut snapshots = HashSet::new();
                for name in [&stages.initial, &stages.working, &stages.completed]
                    .into_iter()
                    .chain(cancelled.as_ref())
                {
                    if name.is_empty() || name.contains('.') || !snapshots.insert(name) {
                        anyhow::bail!(
                            "Resource '{}' has an invalid or repeated snapshot name '{}'",
                            resource.name,
                            name
                        );
                    }
                }
            }
        }

        for index in &self.indexes {
            if self.resource(&index.resource).is_none() {
                anyhow::bail!(
                    "Index '{}' refers to unknown resource '{}'",
                    index.path,
                    index.resource
                );
            }
        }

        Ok(())
    }

    /// Size of the generated sentinel payload, `None` when it overflows
    pub fn large_file_size_bytes(&self) -> Option<usize> {
        self.large_file_size_mb.checked_mul(1024 * 1024)
    }

    /// Look up a resource type by name
    pub fn resource(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Look up a list endpoint by its route below the base path
    pub fn index(&self, path: &str) -> Option<&IndexConfig> {
        self.indexes.iter().find(|i| i.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{ComparisonKind, Direction};

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen.port, 8080);
        assert_eq!(config.base_path, "/v1");
        assert_eq!(config.resources.len(), 4);
        assert_eq!(config.indexes.len(), 5);
        config.validate().unwrap();

        let files = config.resource("files").unwrap();
        assert_eq!(files.ordering.direction, Direction::Descending);
        assert_eq!(files.ordering.comparison, ComparisonKind::Numeric);
        assert!(files.is_sentinel("0"));

        let successful = config.index("jobs/successful").unwrap();
        assert_eq!(successful.index_snapshot(), "completed");
        assert_eq!(config.index("jobs").unwrap().index_snapshot(), "initialising");
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
listen:
  port: 9000
api_key: secret
fixtures_dir: /srv/fixtures
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listen.port, 9000);
        assert_eq!(config.listen.host, "0.0.0.0");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.fixtures_dir, PathBuf::from("/srv/fixtures"));
        assert_eq!(config.resources, default_resources());
        assert_eq!(config.indexes, default_indexes());
    }

    #[test]
    fn test_parse_custom_index() {
        let yaml = r#"
indexes:
  - path: jobs/failed
    resource: jobs
    index_snapshot: completed
    filter:
      type: field_equals
      field: status
      value: failed
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(
            config.indexes,
            vec![IndexConfig::new("jobs/failed", "jobs")
                .with_snapshot("completed")
                .with_filter(RecordFilter::field_equals("status", "failed"))]
        );
    }

    #[test]
    fn test_validate_rejects_unknown_index_resource() {
        let mut config = Config::default();
        config.indexes.push(IndexConfig::new("widgets", "widgets"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown resource 'widgets'"));
    }

    #[test]
    fn test_validate_rejects_duplicate_snapshot() {
        let mut config = Config::default();
        config.resources[3].lifecycle = Lifecycle::Progressive {
            stages: ProgressStages::new("initialising", "initialising", "completed"),
            cancelled: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_resource() {
        let mut config = Config::default();
        config.resources.push(config.resources[0].clone());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_large_file_size() {
        let mut config = Config::default();
        assert_eq!(config.large_file_size_bytes(), Some(1024 * 1024));

        config.large_file_size_mb = 0;
        assert!(config.validate().is_err());

        config.large_file_size_mb = usize::MAX / 1024;
        assert_eq!(config.large_file_size_bytes(), None);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("large_file_size_mb"));

        config.large_file_size_mb = MAX_LARGE_FILE_SIZE_MB;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock.yaml");
        std::fs::write(&path, "base_path: /v2\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.base_path, "/v2");

        std::fs::write(&path, "base_path: v2\n").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}
