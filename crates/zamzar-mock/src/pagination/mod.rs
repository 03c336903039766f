//! Cursor-based pagination over ordered record sequences.
//!
//! This module provides:
//! - `Anchor`: a `before`/`after` cursor naming a record identifier
//! - `PageCoordinates`: limit + anchor, resolved to an index window
//! - `OrderingSpec`: how a resource type orders its identifiers
//!
//! Anchors are resolved against positions in an already-ordered sequence,
//! never against raw identifier values.

mod anchor;
mod coordinates;
mod ordering;

pub use anchor::{Anchor, Orientation};
pub use coordinates::{value_text, PageCoordinates, DEFAULT_LIMIT, MAX_LIMIT};
pub use ordering::{ComparisonKind, Direction, OrderingSpec};

/// Errors raised while resolving a page
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("{0} not found in items")]
    AnchorNotFound(String),
    #[error("before and after are mutually exclusive")]
    ConflictingAnchors,
}
