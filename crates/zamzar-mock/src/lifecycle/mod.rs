//! Simulated asynchronous lifecycles for single-item reads.
//!
//! Polling a resource advances it: the phase returned is the phase entered
//! by that call, so the Nth read of an instance always yields the Nth
//! response of its snapshot sequence, independent of timing.
//!
//! ## Module Structure
//!
//! - `transition`: the pure transition table
//! - `machine`: `LifecycleStateMachine`, the per-instance keyed store

mod machine;
mod transition;

pub use machine::{InstanceKey, LifecycleStateMachine};
pub use transition::next;

use std::fmt;

/// Position of one instance in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Started,
    Processing,
    Completed,
    Cancelled,
    Deleted,
    Destroyed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Started => "started",
            Phase::Processing => "processing",
            Phase::Completed => "completed",
            Phase::Cancelled => "cancelled",
            Phase::Deleted => "deleted",
            Phase::Destroyed => "destroyed",
        }
    }

    /// Terminal phases answer every further read identically
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Phase::Completed | Phase::Cancelled | Phase::Deleted | Phase::Destroyed
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request that may move an instance to another phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// GET of the item or of its content
    Read,
    /// DELETE of the item (file deletion, job cancellation)
    Delete,
    /// POST to the item's `destroy` action
    Destroy,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Read => "read",
            Trigger::Delete => "delete",
            Trigger::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller should send back for a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The named lifecycle snapshot of the instance
    Snapshot(String),
    /// The instance's only fixture
    Current,
    /// A success response with no body
    Empty,
    /// The instance is gone
    NotFound,
}

/// Outcome of applying a trigger to an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub reply: Reply,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("{resource} does not support {trigger}")]
    Unsupported { resource: String, trigger: Trigger },
}
