//! Per-instance lifecycle state.

use super::transition::next;
use super::{LifecycleError, Phase, Transition, Trigger};
use crate::config::{Lifecycle, ResourceConfig};
use crate::metrics;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Identity of one simulated instance
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub resource: String,
    pub id: String,
}

impl InstanceKey {
    pub fn new(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            id: id.into(),
        }
    }
}

/// Tracks the phase of every instance that has been observed
///
/// The map lock is only held long enough to find or insert an instance's
/// slot; each slot has its own mutex covering the whole
/// observe-compute-persist step, so pollers of different instances never
/// wait on each other.
#[derive(Default)]
pub struct LifecycleStateMachine {
    instances: RwLock<HashMap<InstanceKey, Arc<Mutex<Phase>>>>,
}

impl LifecycleStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `trigger` to instance `id` of `resource`, returning the phase
    /// entered and the reply owed to the caller.
    ///
    /// Unseen instances start in `Phase::Started`. Static resources carry
    /// no state at all.
    pub fn apply(
        &self,
        resource: &ResourceConfig,
        id: &str,
        trigger: Trigger,
    ) -> Result<Transition, LifecycleError> {
        let unsupported = || LifecycleError::Unsupported {
            resource: resource.name.clone(),
            trigger,
        };

        if resource.lifecycle == Lifecycle::Static {
            let (to, reply) =
                next(&resource.lifecycle, Phase::Started, trigger).ok_or_else(unsupported)?;
            return Ok(Transition {
                from: Phase::Started,
                to,
                reply,
            });
        }

        let slot = self.slot(InstanceKey::new(resource.name.as_str(), id));
        let mut phase = slot.lock();
        let from = *phase;
        let (to, reply) = next(&resource.lifecycle, from, trigger).ok_or_else(unsupported)?;
        *phase = to;
        drop(phase);

        if from != to {
            debug!(
                "{}/{} {}: {} -> {}",
                resource.name, id, trigger, from, to
            );
            metrics::record_transition(&resource.name, from.as_str(), to.as_str());
        }
        Ok(Transition { from, to, reply })
    }

    /// Current phase of an instance without advancing it
    pub fn phase(&self, resource: &str, id: &str) -> Option<Phase> {
        let key = InstanceKey::new(resource, id);
        let slot = self.instances.read().get(&key).cloned()?;
        let phase = *slot.lock();
        Some(phase)
    }

    /// Forget one instance; its next access starts over
    pub fn reset(&self, resource: &str, id: &str) {
        self.instances
            .write()
            .remove(&InstanceKey::new(resource, id));
    }

    /// Forget every instance
    pub fn reset_all(&self) {
        self.instances.write().clear();
    }

    /// Number of instances being tracked
    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }

    fn slot(&self, key: InstanceKey) -> Arc<Mutex<Phase>> {
        // Opportunistically use just a read lock; take the write lock only to insert
        if let Some(slot) = self.instances.read().get(&key) {
            return Arc::clone(slot);
        }
        let mut instances = self.instances.write();
        Arc::clone(instances.entry(key).or_default())
    }
}
