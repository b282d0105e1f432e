//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one sync function per UI interaction (Add, Save, Cancel, Edit,
//!   Delete, Logout, login/signup).
//! - Own the single process-wide controller behind a mutex.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - The mutex serializes every call, so the signup check-then-write on the
//!   credential store cannot interleave.

use mockable::DefaultClock;
use std::sync::{Mutex, MutexGuard};
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, AppConfig,
    SqliteKeyValueStore, Task, TodoApp,
};

type FfiApp = TodoApp<SqliteKeyValueStore, DefaultClock>;

static APP: Mutex<Option<FfiApp>> = Mutex::new(None);

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path for rolling log files.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row as rendered by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    /// Whether this row currently shows the edit field.
    pub editing: bool,
}

/// Snapshot of everything the main view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    /// `None` means the login/signup views should be shown.
    pub active_user: Option<String>,
    pub items: Vec<TaskItem>,
    /// Draft text of the row being edited, if any.
    pub edit_draft: Option<String>,
    pub remaining: u32,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Created task id for `task_add`.
    pub task_id: Option<i64>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            task_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Registers an account and logs it in.
#[flutter_rust_bridge::frb(sync)]
pub fn session_signup(identifier: String, secret: String) -> ActionResponse {
    run_action("session_signup", |app| {
        app.signup(&identifier, &secret)
            .map(|()| ActionResponse::success("Account created."))
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn session_login(identifier: String, secret: String) -> ActionResponse {
    run_action("session_login", |app| {
        app.login(&identifier, &secret)
            .map(|()| ActionResponse::success("Logged in."))
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn session_logout() -> ActionResponse {
    run_action("session_logout", |app| {
        app.logout()
            .map(|()| ActionResponse::success("Logged out."))
            .map_err(|err| err.to_string())
    })
}

/// Returns the logged-in identifier, or `None` when logged out or unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn session_current_user() -> Option<String> {
    with_app(|app| Ok(app.active_user().map(str::to_owned)))
        .ok()
        .flatten()
}

/// Renders the current list. Unavailable storage yields an empty view.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list() -> TaskListView {
    with_app(|app| Ok(to_view(app))).unwrap_or_else(|err| {
        log::error!("event=ffi_call module=ffi call=task_list status=error error={err}");
        TaskListView {
            active_user: None,
            items: Vec::new(),
            edit_draft: None,
            remaining: 0,
        }
    })
}

/// Adds a task; blank input is accepted as a no-op with `task_id = None`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String) -> ActionResponse {
    run_action("task_add", |app| match app.add_task(&text) {
        Ok(Some(id)) => Ok(ActionResponse {
            task_id: Some(id),
            ..ActionResponse::success("Task added.")
        }),
        Ok(None) => Ok(ActionResponse::success("Nothing to add.")),
        Err(err) => Err(err.to_string()),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64) -> ActionResponse {
    run_action("task_toggle", |app| {
        app.toggle_task(id)
            .map(|found| ActionResponse::success(found_message(found, "Task toggled.")))
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> ActionResponse {
    run_action("task_delete", |app| {
        app.remove_task(id)
            .map(|found| ActionResponse::success(found_message(found, "Task deleted.")))
            .map_err(|err| err.to_string())
    })
}

/// Opens the edit field on `id`, seeded with the task's current text.
#[flutter_rust_bridge::frb(sync)]
pub fn task_begin_edit(id: i64, current_text: String) -> ActionResponse {
    run_action("task_begin_edit", |app| {
        app.begin_edit(id, current_text);
        Ok(ActionResponse::success("Editing."))
    })
}

/// Mirrors the edit field's content into the draft.
#[flutter_rust_bridge::frb(sync)]
pub fn task_update_draft(text: String) -> ActionResponse {
    run_action("task_update_draft", |app| {
        if app.update_draft(text) {
            Ok(ActionResponse::success("Draft updated."))
        } else {
            Err("no task is being edited".to_string())
        }
    })
}

/// Save button.
#[flutter_rust_bridge::frb(sync)]
pub fn task_commit_edit() -> ActionResponse {
    run_action("task_commit_edit", |app| {
        app.commit_edit()
            .map(|updated| ActionResponse::success(found_message(updated, "Task saved.")))
            .map_err(|err| err.to_string())
    })
}

/// Cancel button.
#[flutter_rust_bridge::frb(sync)]
pub fn task_cancel_edit() -> ActionResponse {
    run_action("task_cancel_edit", |app| {
        app.cancel_edit();
        Ok(ActionResponse::success("Edit cancelled."))
    })
}

fn found_message(found: bool, message: &str) -> String {
    if found {
        message.to_string()
    } else {
        "No matching task.".to_string()
    }
}

fn to_view(app: &FfiApp) -> TaskListView {
    let edit = app.edit_state();
    TaskListView {
        active_user: app.active_user().map(str::to_owned),
        items: app
            .tasks()
            .iter()
            .map(|task: &Task| TaskItem {
                id: task.id,
                text: task.text.clone(),
                completed: task.completed,
                editing: edit.is_editing(task.id),
            })
            .collect(),
        edit_draft: edit.draft().map(str::to_owned),
        remaining: u32::try_from(app.remaining_count()).unwrap_or(u32::MAX),
    }
}

fn run_action(
    call: &str,
    f: impl FnOnce(&mut FfiApp) -> Result<ActionResponse, String>,
) -> ActionResponse {
    match with_app(f) {
        Ok(response) => response,
        Err(err) => {
            log::warn!("event=ffi_call module=ffi call={call} status=error error={err}");
            ActionResponse::failure(format!("{call} failed: {err}"))
        }
    }
}

/// Runs `f` on the shared controller, opening it on first use.
fn with_app<T>(f: impl FnOnce(&mut FfiApp) -> Result<T, String>) -> Result<T, String> {
    let mut guard = lock_app()?;
    if guard.is_none() {
        *guard = Some(open_app()?);
    }
    match guard.as_mut() {
        Some(app) => f(app),
        None => Err("app state unavailable".to_string()),
    }
}

fn lock_app() -> Result<MutexGuard<'static, Option<FfiApp>>, String> {
    APP.lock()
        .map_err(|_| "app state poisoned by an earlier failure".to_string())
}

fn open_app() -> Result<FfiApp, String> {
    let config = AppConfig::from_env()?;
    let store = SqliteKeyValueStore::open(&config.db_path)
        .map_err(|err| format!("state DB open failed: {err}"))?;
    TodoApp::open_with_system_clock(store).map_err(|err| format!("session restore failed: {err}"))
}
