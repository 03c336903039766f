use super::{Phase, Reply, Trigger};
use crate::config::Lifecycle;

/// Compute the phase entered, and the reply owed, when `trigger` hits an
/// instance currently in `phase`.
///
/// Returns `None` when the lifecycle has no such trigger.
pub fn next(lifecycle: &Lifecycle, phase: Phase, trigger: Trigger) -> Option<(Phase, Reply)> {
    match lifecycle {
        Lifecycle::Static => match trigger {
            Trigger::Read => Some((phase, Reply::Current)),
            Trigger::Delete | Trigger::Destroy => None,
        },

        Lifecycle::Deletable => match (phase, trigger) {
            (_, Trigger::Destroy) => None,
            (Phase::Deleted, _) => Some((Phase::Deleted, Reply::NotFound)),
            (_, Trigger::Read) => Some((phase, Reply::Current)),
            // a delete still echoes the resource
            (_, Trigger::Delete) => Some((Phase::Deleted, Reply::Current)),
        },

        Lifecycle::Progressive { stages, cancelled } => match (phase, trigger) {
            (_, Trigger::Destroy) => Some((Phase::Destroyed, Reply::Empty)),
            (Phase::Destroyed | Phase::Deleted, _) => Some((phase, Reply::NotFound)),

            (_, Trigger::Delete) => {
                let snapshot = cancelled.as_ref()?;
                Some((Phase::Cancelled, Reply::Snapshot(snapshot.clone())))
            }

            (Phase::Started, Trigger::Read) => Some((
                Phase::Processing,
                Reply::Snapshot(stages.initial.clone()),
            )),
            (Phase::Processing, Trigger::Read) => Some((
                Phase::Completed,
                Reply::Snapshot(stages.working.clone()),
            )),
            (Phase::Completed, Trigger::Read) => Some((
                Phase::Completed,
                Reply::Snapshot(stages.completed.clone()),
            )),
            (Phase::Cancelled, Trigger::Read) => match cancelled {
                Some(snapshot) => Some((Phase::Cancelled, Reply::Snapshot(snapshot.clone()))),
                None => Some((Phase::Cancelled, Reply::NotFound)),
            },
        },
    }
}
