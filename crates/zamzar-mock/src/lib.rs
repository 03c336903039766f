//! Mock of the Zamzar file conversion API.
//!
//! Serves canned fixtures for accounts, files, formats, imports and jobs.
//! Single-item reads of imports and jobs progress through their lifecycle
//! one poll at a time, and list endpoints page over the fixture set with
//! `before`/`after` cursors.

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod lifecycle;
pub mod metrics;
pub mod pagination;
pub mod server;

pub use catalog::{DirectorySource, FixtureCatalog, FixtureSource, InMemorySource};
pub use config::Config;
pub use error::MockError;
pub use lifecycle::LifecycleStateMachine;
pub use server::{MockApi, MockServer};
