use super::CatalogError;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Backend-agnostic access to the fixture tree
///
/// Paths are `/`-separated and relative to the fixture root, e.g.
/// `jobs/1.completed.json`.
pub trait FixtureSource: Send + Sync {
    /// Read a fixture's raw bytes
    fn read(&self, path: &str) -> Result<Bytes, CatalogError>;

    /// Names of the files directly inside `dir`; an absent directory is empty
    fn list(&self, dir: &str) -> Result<Vec<String>, CatalogError>;

    /// Delete a fixture
    fn remove(&self, path: &str) -> Result<(), CatalogError>;
}

/// Fixtures stored on the local filesystem
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a relative fixture path, refusing anything that escapes the root
    fn resolve(&self, path: &str) -> Result<PathBuf, CatalogError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(CatalogError::NotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl FixtureSource for DirectorySource {
    fn read(&self, path: &str) -> Result<Bytes, CatalogError> {
        let full = self.resolve(path)?;
        match std::fs::read(&full) {
            Ok(contents) => Ok(Bytes::from(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CatalogError::NotFound(path.to_string()))
            }
            Err(e) => Err(CatalogError::Io {
                path: path.to_string(),
                source: e,
            }),
        }
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, CatalogError> {
        let full = self.resolve(dir)?;
        let entries = match std::fs::read_dir(&full) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CatalogError::Io {
                    path: dir.to_string(),
                    source: e,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CatalogError::Io {
                path: dir.to_string(),
                source: e,
            })?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn remove(&self, path: &str) -> Result<(), CatalogError> {
        let full = self.resolve(path)?;
        std::fs::remove_file(&full).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CatalogError::NotFound(path.to_string())
            } else {
                CatalogError::Io {
                    path: path.to_string(),
                    source: e,
                }
            }
        })
    }
}
