//! Task record and id assignment.

use serde::{Deserialize, Serialize};

/// Task identity: creation timestamp in Unix epoch milliseconds.
pub type TaskId = i64;

/// One to-do item as rendered and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Text as entered; never trimmed.
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Creates an open (not completed) task.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Picks the id for a task created at `now_ms`.
///
/// Uses the timestamp unless it would collide with or precede `last_id`,
/// which keeps ids unique and increasing within one list. Returns `None`
/// when `last_id` is already `TaskId::MAX` and no larger id exists.
pub fn next_task_id(now_ms: i64, last_id: Option<TaskId>) -> Option<TaskId> {
    match last_id {
        Some(last) if now_ms <= last => last.checked_add(1),
        _ => Some(now_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::{next_task_id, Task};

    #[test]
    fn new_task_is_open() {
        let task = Task::new(7, "  buy milk ");
        assert_eq!(task.text, "  buy milk ");
        assert!(!task.completed);
    }

    #[test]
    fn next_id_uses_clock_when_ahead() {
        assert_eq!(next_task_id(1_700_000_000_000, None), Some(1_700_000_000_000));
        assert_eq!(next_task_id(2_000, Some(1_000)), Some(2_000));
    }

    #[test]
    fn next_id_bumps_on_same_millisecond_or_clock_skew() {
        assert_eq!(next_task_id(1_000, Some(1_000)), Some(1_001));
        assert_eq!(next_task_id(900, Some(1_000)), Some(1_001));
    }

    #[test]
    fn next_id_never_repeats_max() {
        assert_eq!(next_task_id(1_000, Some(i64::MAX)), None);
        assert_eq!(next_task_id(i64::MAX, Some(i64::MAX - 1)), Some(i64::MAX));
    }

    #[test]
    fn serialized_shape_matches_storage_layout() {
        let json = serde_json::to_value(Task::new(42, "task1")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 42, "text": "task1", "completed": false})
        );
    }
}
