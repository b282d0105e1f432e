//! Domain model for accounts, task lists and in-progress edits.
//!
//! # Invariants
//! - A task belongs to exactly one user's list; lists are never shared.
//! - Credential identifiers are unique.
//! - An edit draft cannot exist without the task id it targets.

pub mod credential;
pub mod edit;
pub mod task;
