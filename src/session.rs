//! Per-user state: the task identifiers a simulated user has seen.
//!
//! Each [`GooseUser`] carries its own [`KnownTasks`] as Goose session data, so
//! nothing is shared between users and no locking is needed. The list is best
//! effort: other users delete tasks concurrently, so entries may point at
//! records that are already gone.

use goose::goose::GooseUser;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::payload::{TaskId, TaskRef};

/// Number of known tasks that deletes never go below, so reads and updates
/// keep finding targets.
pub const DELETE_FLOOR: usize = 5;

/// Ordered list of task identifiers observed in API responses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KnownTasks {
    ids: Vec<TaskId>,
}

impl KnownTasks {
    pub fn new() -> Self {
        KnownTasks::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[TaskId] {
        &self.ids
    }

    /// Replaces the list with the identifiers of a task listing, skipping
    /// records without an `id`.
    pub fn refresh(&mut self, tasks: Vec<TaskRef>) {
        self.ids = tasks.into_iter().filter_map(|task| task.id).collect();
    }

    /// Appends a newly created task. Duplicates are kept.
    pub fn record(&mut self, id: TaskId) {
        self.ids.push(id);
    }

    /// Picks a known task uniformly at random.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&TaskId> {
        self.ids.choose(rng)
    }

    /// Removes and returns the most recently added task, but only while more
    /// than [`DELETE_FLOOR`] tasks are known.
    pub fn take_for_delete(&mut self) -> Option<TaskId> {
        if self.ids.len() > DELETE_FLOOR {
            self.ids.pop()
        } else {
            None
        }
    }
}

impl FromIterator<TaskId> for KnownTasks {
    fn from_iter<I: IntoIterator<Item = TaskId>>(iter: I) -> Self {
        KnownTasks {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Returns the user's known tasks, starting an empty list if the user has none
/// yet.
pub fn known_tasks(user: &mut GooseUser) -> &mut KnownTasks {
    if user.get_session_data::<KnownTasks>().is_none() {
        user.set_session_data(KnownTasks::new());
    }
    user.get_session_data_unchecked_mut::<KnownTasks>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::RangeInclusive<i64>) -> KnownTasks {
        range.map(TaskId::from).collect()
    }

    fn listing(ids: &[Option<i64>]) -> Vec<TaskRef> {
        ids.iter()
            .map(|id| TaskRef {
                id: id.map(TaskId::from),
            })
            .collect()
    }

    #[test]
    fn refresh_replaces_with_listed_ids() {
        let mut known = ids(100..=110);
        known.refresh(listing(&[Some(1), None, Some(3), Some(3)]));
        assert_eq!(
            known.ids(),
            &[TaskId::from(1), TaskId::from(3), TaskId::from(3)]
        );

        // Refreshing with the same listing again gives the same list.
        let before = known.clone();
        known.refresh(listing(&[Some(1), None, Some(3), Some(3)]));
        assert_eq!(known, before);

        known.refresh(Vec::new());
        assert!(known.is_empty());
    }

    #[test]
    fn record_appends_without_dedup() {
        let mut known = KnownTasks::new();
        known.record(TaskId::from(42));
        assert_eq!(known.ids(), &[TaskId::from(42)]);
        known.record(TaskId::from(42));
        assert_eq!(known.len(), 2);
        assert_eq!(known.ids().last(), Some(&TaskId::from(42)));
    }

    #[test]
    fn delete_respects_floor() {
        for size in 0..=DELETE_FLOOR as i64 {
            let mut known = ids(1..=size);
            assert!(known.take_for_delete().is_none());
            assert_eq!(known.len(), size as usize);
        }

        let mut known = ids(1..=6);
        let removed = known.take_for_delete().unwrap();
        assert_eq!(removed, TaskId::from(6));
        assert_eq!(known.len(), 5);
        assert!(!known.ids().contains(&removed));
        assert!(known.take_for_delete().is_none());
    }

    #[test]
    fn pick_only_returns_known_ids() {
        let mut rng = rand::rng();
        assert!(KnownTasks::new().pick(&mut rng).is_none());

        let known = ids(1..=3);
        for _ in 0..50 {
            let id = known.pick(&mut rng).unwrap();
            assert!(known.ids().contains(id));
        }
    }
}
