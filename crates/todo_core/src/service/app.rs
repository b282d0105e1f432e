//! Application controller handed to front-ends.
//!
//! # Invariants
//! - Task operations act on the list of the active user only.
//! - One controller owns one store; front-ends never touch storage directly.

use crate::model::edit::EditState;
use crate::model::task::{Task, TaskId};
use crate::service::session_service::{SessionManager, SessionResult};
use crate::service::task_service::{TaskError, TaskListStore, TaskResult};
use crate::store::{KeyValueStore, StoreResult};
use mockable::{Clock, DefaultClock};

/// Session manager and task list over one store and clock.
pub struct TodoApp<S, C = DefaultClock> {
    store: S,
    clock: C,
    session: SessionManager,
    tasks: TaskListStore,
}

impl<S: KeyValueStore> TodoApp<S, DefaultClock> {
    /// Opens the app with the system clock and restores any prior session.
    pub fn open_with_system_clock(store: S) -> StoreResult<Self> {
        Self::open(store, DefaultClock)
    }
}

impl<S: KeyValueStore, C: Clock> TodoApp<S, C> {
    /// Creates a logged-out controller without reading storage.
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            session: SessionManager::default(),
            tasks: TaskListStore::default(),
        }
    }

    /// Creates a controller and runs the startup session restore.
    pub fn open(store: S, clock: C) -> StoreResult<Self> {
        let mut app = Self::new(store, clock);
        app.restore_session()?;
        Ok(app)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn active_user(&self) -> Option<&str> {
        self.session.active_user()
    }

    /// Tasks of the active user in insertion order; empty when logged out.
    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn remaining_count(&self) -> usize {
        self.tasks.remaining_count()
    }

    pub fn edit_state(&self) -> &EditState {
        self.tasks.edit_state()
    }

    pub fn signup(&mut self, identifier: &str, secret: &str) -> SessionResult<()> {
        self.session
            .signup(&self.store, &mut self.tasks, identifier, secret)
    }

    pub fn login(&mut self, identifier: &str, secret: &str) -> SessionResult<()> {
        self.session
            .login(&self.store, &mut self.tasks, identifier, secret)
    }

    pub fn logout(&mut self) -> StoreResult<()> {
        self.session.logout(&self.store, &mut self.tasks)
    }

    pub fn restore_session(&mut self) -> StoreResult<bool> {
        self.session.restore_session(&self.store, &mut self.tasks)
    }

    /// See [`TaskListStore::add`].
    pub fn add_task(&mut self, text: &str) -> TaskResult<Option<TaskId>> {
        let owner = self.session.active_user().ok_or(TaskError::NoActiveSession)?;
        self.tasks.add(&self.store, &self.clock, owner, text)
    }

    pub fn toggle_task(&mut self, id: TaskId) -> TaskResult<bool> {
        let owner = self.session.active_user().ok_or(TaskError::NoActiveSession)?;
        Ok(self.tasks.toggle(&self.store, owner, id)?)
    }

    pub fn remove_task(&mut self, id: TaskId) -> TaskResult<bool> {
        let owner = self.session.active_user().ok_or(TaskError::NoActiveSession)?;
        Ok(self.tasks.remove(&self.store, owner, id)?)
    }

    pub fn begin_edit(&mut self, id: TaskId, current_text: impl Into<String>) {
        self.tasks.begin_edit(id, current_text);
    }

    pub fn update_draft(&mut self, text: impl Into<String>) -> bool {
        self.tasks.update_draft(text)
    }

    pub fn commit_edit(&mut self) -> TaskResult<bool> {
        let owner = self.session.active_user().ok_or(TaskError::NoActiveSession)?;
        Ok(self.tasks.commit_edit(&self.store, owner)?)
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.tasks.cancel_edit()
    }
}
