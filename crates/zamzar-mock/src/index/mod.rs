//! List ("index") responses.
//!
//! Discovered snapshots are ordered, reduced to one entry per identifier,
//! rendered through the index snapshot, filtered and finally paged.

mod builder;
mod filter;

pub use builder::IndexBuilder;
pub use filter::RecordFilter;

use crate::catalog::CatalogError;
use crate::pagination::PaginationError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error("Index snapshot {path} is missing from the fixture set")]
    MissingSnapshot { path: String },
}

/// Body of a list response
#[derive(Debug, Clone, Serialize)]
pub struct PagedResponse {
    pub data: Vec<Value>,
    pub paging: Paging,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paging {
    /// Records matching the filter, before paging
    pub total_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<Value>,
    pub limit: usize,
}
