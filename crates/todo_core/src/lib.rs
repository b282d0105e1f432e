//! Core of the local to-do application.
//! Session gating, per-user task lists and their key/value persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::credential::CredentialStore;
pub use model::edit::EditState;
pub use model::task::{Task, TaskId};
pub use service::app::TodoApp;
pub use service::session_service::{SessionError, SessionManager, SessionResult};
pub use service::task_service::{TaskError, TaskListStore, TaskResult};
pub use store::sqlite_store::SqliteKeyValueStore;
pub use store::{KeyValueStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
