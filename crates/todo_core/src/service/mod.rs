//! Use-case services driving the to-do application.
//!
//! # Responsibility
//! - `SessionManager` gates access: signup, login, logout, restore.
//! - `TaskListStore` owns the active user's list and its edit state.
//! - `TodoApp` composes both over one store and clock for front-ends.
//!
//! # Invariants
//! - Every successful list mutation is followed by a full-list write.
//! - Switching user reloads the list and drops any in-progress edit.

pub mod app;
pub mod session_service;
pub mod task_service;
