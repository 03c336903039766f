//! Resource type definitions: ordering, lifecycle and snapshot naming.

use crate::pagination::OrderingSpec;
use serde::{Deserialize, Serialize};

/// A named category of records served from `<fixtures>/<name>/`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceConfig {
    pub name: String,
    pub ordering: OrderingSpec,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    /// Identifier reserved for oversized payloads; never listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<String>,
}

/// How single-item reads of a resource evolve over time
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Lifecycle {
    /// Every read returns the same fixture
    #[default]
    Static,
    /// Reads return the fixture until a delete; afterwards not found
    Deletable,
    /// Each read advances through `stages`; a delete cancels when
    /// `cancelled` names a snapshot
    Progressive {
        stages: ProgressStages,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cancelled: Option<String>,
    },
}

/// Snapshot names returned by the first, second and later reads
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgressStages {
    pub initial: String,
    pub working: String,
    pub completed: String,
}

impl ProgressStages {
    pub fn new(
        initial: impl Into<String>,
        working: impl Into<String>,
        completed: impl Into<String>,
    ) -> Self {
        Self {
            initial: initial.into(),
            working: working.into(),
            completed: completed.into(),
        }
    }
}

impl Lifecycle {
    /// Snapshot suffixes understood for this lifecycle
    pub fn snapshot_names(&self) -> Vec<&str> {
        match self {
            Lifecycle::Static | Lifecycle::Deletable => Vec::new(),
            Lifecycle::Progressive { stages, cancelled } => {
                let mut names = vec![
                    stages.initial.as_str(),
                    stages.working.as_str(),
                    stages.completed.as_str(),
                ];
                names.extend(cancelled.as_deref());
                names
            }
        }
    }
}

impl ResourceConfig {
    pub fn new(name: impl Into<String>, ordering: OrderingSpec, lifecycle: Lifecycle) -> Self {
        Self {
            name: name.into(),
            ordering,
            lifecycle,
            sentinel: None,
        }
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = Some(sentinel.into());
        self
    }

    pub fn is_sentinel(&self, id: &str) -> bool {
        self.sentinel.as_deref() == Some(id)
    }

    /// Split a compound name such as `12.converting` into its identifier
    /// and snapshot.
    ///
    /// Only suffixes this resource knows as snapshots are split off, so a
    /// dotted identifier like `tar.gz` is returned whole.
    pub fn split_compound<'a>(&self, compound: &'a str) -> (&'a str, Option<&'a str>) {
        if let Some((id, suffix)) = compound.rsplit_once('.') {
            if !id.is_empty() && self.lifecycle.snapshot_names().contains(&suffix) {
                return (id, Some(suffix));
            }
        }
        (compound, None)
    }

    /// The identifier part of a compound name
    pub fn base_identifier<'a>(&self, compound: &'a str) -> &'a str {
        self.split_compound(compound).0
    }
}

/// Resource types served by the production mock
pub fn default_resources() -> Vec<ResourceConfig> {
    vec![
        ResourceConfig::new(
            "files",
            OrderingSpec::numeric_descending("id"),
            Lifecycle::Deletable,
        )
        .with_sentinel("0"),
        ResourceConfig::new(
            "formats",
            OrderingSpec::lexical_ascending("name"),
            Lifecycle::Static,
        ),
        ResourceConfig::new(
            "imports",
            OrderingSpec::numeric_descending("id"),
            Lifecycle::Progressive {
                stages: ProgressStages::new("initialising", "downloading", "completed"),
                cancelled: None,
            },
        ),
        ResourceConfig::new(
            "jobs",
            OrderingSpec::numeric_descending("id"),
            Lifecycle::Progressive {
                stages: ProgressStages::new("initialising", "converting", "completed"),
                cancelled: Some("cancelled".to_string()),
            },
        ),
    ]
}
