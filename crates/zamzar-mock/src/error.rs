//! Crate-level error type and its HTTP status mapping.

use crate::catalog::CatalogError;
use crate::index::IndexError;
use crate::lifecycle::LifecycleError;
use crate::pagination::PaginationError;
use hyper::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Missing or invalid API key")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    InvalidQuery(String),

    #[error("Fixture set is misconfigured: {0}")]
    Misconfigured(String),
}

impl From<IndexError> for MockError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Catalog(e) => MockError::Catalog(e),
            IndexError::Pagination(e) => MockError::Pagination(e),
            e @ IndexError::MissingSnapshot { .. } => MockError::Misconfigured(e.to_string()),
        }
    }
}

impl MockError {
    pub fn status(&self) -> StatusCode {
        match self {
            MockError::Pagination(_) | MockError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            MockError::Unauthorized => StatusCode::UNAUTHORIZED,
            MockError::NotFound(_)
            | MockError::Lifecycle(_)
            | MockError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            MockError::Catalog(_) | MockError::Misconfigured(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
