//! Task list use cases for the active user.
//!
//! # Invariants
//! - The persisted list under `todos_<owner>` always equals the in-memory
//!   list after the latest mutation.
//! - At most one task is being edited; a new `begin_edit` replaces it.
//! - `add` rejects blank text but `commit_edit` stores any draft verbatim.

use crate::model::edit::EditState;
use crate::model::task::{next_task_id, Task, TaskId};
use crate::store::{records, todos_key, KeyValueStore, StoreError, StoreResult};
use log::{debug, info, warn};
use mockable::Clock;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskResult<T> = Result<T, TaskError>;

/// Failure of a task list operation.
#[derive(Debug)]
pub enum TaskError {
    /// No user is logged in, so there is no list to act on.
    NoActiveSession,
    /// The list already holds the largest possible id.
    IdsExhausted,
    Store(StoreError),
}

impl Display for TaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveSession => write!(f, "no active session"),
            Self::IdsExhausted => write!(f, "no task id left above the newest task"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoActiveSession | Self::IdsExhausted => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for TaskError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// In-memory task list of the active user plus its edit slot.
///
/// Storage and identity are passed per call; the list itself does not know
/// which user it belongs to.
#[derive(Debug, Default)]
pub struct TaskListStore {
    tasks: Vec<Task>,
    edit: EditState,
}

impl TaskListStore {
    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    /// Number of tasks not yet completed.
    pub fn remaining_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    /// Reads `owner`'s persisted list and writes it back normalized.
    ///
    /// Missing or malformed data reads as an empty list. In-memory state is
    /// untouched; pass the result to [`Self::install`] once the switch to
    /// `owner` is committed.
    pub fn fetch<S: KeyValueStore + ?Sized>(store: &S, owner: &str) -> StoreResult<Vec<Task>> {
        let key = todos_key(owner);
        let tasks: Vec<Task> = records::load_or_default(store, &key)?;
        records::save(store, &key, &tasks)?;
        Ok(tasks)
    }

    /// Overwrites `owner`'s persisted list with an empty one.
    pub fn reset<S: KeyValueStore + ?Sized>(store: &S, owner: &str) -> StoreResult<()> {
        records::save(store, &todos_key(owner), &Vec::<Task>::new())
    }

    /// Makes `tasks` the active list and drops any in-progress edit.
    pub fn install(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.edit = EditState::Idle;
        info!(
            "event=task_list_load module=tasks status=ok task_count={}",
            self.tasks.len()
        );
    }

    /// Drops in-memory state only; persisted lists are kept.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.edit = EditState::Idle;
    }

    /// Appends a new open task unless `text` is blank.
    ///
    /// Returns the new task id, or `None` when the input was rejected.
    /// Fails with `IdsExhausted` rather than reuse an id.
    pub fn add<S, C>(
        &mut self,
        store: &S,
        clock: &C,
        owner: &str,
        text: &str,
    ) -> TaskResult<Option<TaskId>>
    where
        S: KeyValueStore + ?Sized,
        C: Clock + ?Sized,
    {
        if text.trim().is_empty() {
            debug!("event=task_add module=tasks status=skipped reason=blank_text");
            return Ok(None);
        }

        let last_id = self.tasks.iter().map(|task| task.id).max();
        let Some(id) = next_task_id(clock.utc().timestamp_millis(), last_id) else {
            warn!("event=task_add module=tasks status=rejected reason=ids_exhausted");
            return Err(TaskError::IdsExhausted);
        };
        self.tasks.push(Task::new(id, text));
        if let Err(err) = self.persist(store, owner) {
            self.tasks.pop();
            return Err(err.into());
        }

        info!(
            "event=task_add module=tasks status=ok task_count={}",
            self.tasks.len()
        );
        Ok(Some(id))
    }

    /// Flips completion of task `id`. Returns whether the task existed.
    pub fn toggle<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        owner: &str,
        id: TaskId,
    ) -> StoreResult<bool> {
        let found = match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        };
        self.persist(store, owner)?;
        debug!("event=task_toggle module=tasks status=ok found={found}");
        Ok(found)
    }

    /// Deletes task `id`. Returns whether anything was removed.
    pub fn remove<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        owner: &str,
        id: TaskId,
    ) -> StoreResult<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        self.persist(store, owner)?;
        info!(
            "event=task_remove module=tasks status=ok removed={removed} task_count={}",
            self.tasks.len()
        );
        Ok(removed)
    }

    /// Opens the edit slot on `id`, seeded with `current_text`.
    pub fn begin_edit(&mut self, id: TaskId, current_text: impl Into<String>) {
        self.edit = EditState::Editing {
            task_id: id,
            draft: current_text.into(),
        };
    }

    /// Replaces the draft of the in-progress edit. `false` when idle.
    pub fn update_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.edit {
            EditState::Editing { draft, .. } => {
                *draft = text.into();
                true
            }
            EditState::Idle => false,
        }
    }

    /// Writes the draft into the edited task and returns to idle.
    ///
    /// The draft is stored as-is, including empty text. Returns whether a
    /// task was updated; `false` when idle or the task no longer exists.
    pub fn commit_edit<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        owner: &str,
    ) -> StoreResult<bool> {
        let EditState::Editing { task_id, draft } = std::mem::take(&mut self.edit) else {
            return Ok(false);
        };

        let updated = match self.tasks.iter_mut().find(|task| task.id == task_id) {
            Some(task) => {
                task.text = draft;
                true
            }
            None => false,
        };
        self.persist(store, owner)?;
        debug!("event=task_edit module=tasks status=committed updated={updated}");
        Ok(updated)
    }

    /// Discards the in-progress edit. Returns whether one was open.
    pub fn cancel_edit(&mut self) -> bool {
        let was_editing = self.edit != EditState::Idle;
        self.edit = EditState::Idle;
        was_editing
    }

    fn persist<S: KeyValueStore + ?Sized>(&self, store: &S, owner: &str) -> StoreResult<()> {
        records::save(store, &todos_key(owner), &self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskError, TaskListStore};
    use crate::model::edit::EditState;
    use crate::model::task::Task;
    use crate::store::sqlite_store::SqliteKeyValueStore;
    use crate::store::{records, KeyValueStore};
    use mockable::DefaultClock;

    const OWNER: &str = "a@x.com";

    fn setup() -> (SqliteKeyValueStore, TaskListStore) {
        (
            SqliteKeyValueStore::open_in_memory().unwrap(),
            TaskListStore::default(),
        )
    }

    fn persisted(store: &SqliteKeyValueStore) -> Vec<Task> {
        records::load_or_default(store, "todos_a@x.com").unwrap()
    }

    #[test]
    fn blank_text_is_not_persisted() {
        let (store, mut list) = setup();

        assert_eq!(list.add(&store, &DefaultClock, OWNER, "   ").unwrap(), None);
        assert!(list.tasks().is_empty());
        assert_eq!(store.get("todos_a@x.com").unwrap(), None);
    }

    #[test]
    fn ids_stay_unique_for_rapid_adds() {
        let (store, mut list) = setup();
        for n in 0..20 {
            list.add(&store, &DefaultClock, OWNER, &format!("t{n}"))
                .unwrap();
        }

        let ids: Vec<_> = list.tasks().iter().map(|task| task.id).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn every_mutation_writes_full_list() {
        let (store, mut list) = setup();
        let first = list
            .add(&store, &DefaultClock, OWNER, "one")
            .unwrap()
            .unwrap();
        list.add(&store, &DefaultClock, OWNER, "two").unwrap();
        assert_eq!(persisted(&store), list.tasks());

        list.toggle(&store, OWNER, first).unwrap();
        assert_eq!(persisted(&store), list.tasks());

        list.remove(&store, OWNER, first).unwrap();
        assert_eq!(persisted(&store), list.tasks());
        assert_eq!(persisted(&store).len(), 1);
    }

    #[test]
    fn add_after_max_id_is_rejected_without_duplicate() {
        let (store, mut list) = setup();
        list.install(vec![Task::new(i64::MAX, "last")]);

        let err = list.add(&store, &DefaultClock, OWNER, "one more").unwrap_err();

        assert!(matches!(err, TaskError::IdsExhausted));
        assert_eq!(list.tasks().len(), 1);
        assert_eq!(store.get("todos_a@x.com").unwrap(), None);
    }

    #[test]
    fn fetch_normalizes_without_touching_memory() {
        let (store, mut list) = setup();
        list.install(vec![Task::new(1, "mine")]);
        store.set("todos_a@x.com", "[{broken").unwrap();

        let fetched = TaskListStore::fetch(&store, OWNER).unwrap();

        assert!(fetched.is_empty());
        assert_eq!(store.get("todos_a@x.com").unwrap().as_deref(), Some("[]"));
        assert_eq!(list.tasks().len(), 1);
    }

    #[test]
    fn switching_edit_target_keeps_only_latest() {
        let (_store, mut list) = setup();
        list.begin_edit(1, "first");
        list.begin_edit(2, "second");

        assert_eq!(
            list.edit_state(),
            &EditState::Editing {
                task_id: 2,
                draft: "second".to_string()
            }
        );
    }

    #[test]
    fn commit_on_deleted_task_is_noop_and_returns_idle() {
        let (store, mut list) = setup();
        let id = list
            .add(&store, &DefaultClock, OWNER, "doomed")
            .unwrap()
            .unwrap();
        list.begin_edit(id, "doomed");
        list.remove(&store, OWNER, id).unwrap();

        assert!(!list.commit_edit(&store, OWNER).unwrap());
        assert_eq!(list.edit_state(), &EditState::Idle);
        assert!(list.tasks().is_empty());
    }

    #[test]
    fn update_draft_requires_open_edit() {
        let (_store, mut list) = setup();
        assert!(!list.update_draft("x"));
        assert!(!list.cancel_edit());

        list.begin_edit(5, "old");
        assert!(list.update_draft("new"));
        assert_eq!(list.edit_state().draft(), Some("new"));
        assert!(list.cancel_edit());
    }

    #[test]
    fn remaining_count_ignores_completed() {
        let (store, mut list) = setup();
        let id = list
            .add(&store, &DefaultClock, OWNER, "a")
            .unwrap()
            .unwrap();
        list.add(&store, &DefaultClock, OWNER, "b").unwrap();
        list.toggle(&store, OWNER, id).unwrap();

        assert_eq!(list.remaining_count(), 1);
    }
}
