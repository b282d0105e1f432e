//! Key/value persistence for session and task state.
//!
//! # Responsibility
//! - Define the storage contract the session and task services write through.
//! - Own the persisted key layout shared by every front-end.
//!
//! # Invariants
//! - Every write is a full overwrite of one key's value.
//! - Values are JSON text; readers degrade malformed values to defaults.
//! - Backend failures surface as `StoreError`, never as panics.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod records;
pub mod sqlite_store;

/// Credential store key (identifier -> secret map).
pub const USERS_KEY: &str = "users";
/// Active session pointer key.
pub const SESSION_KEY: &str = "todoUser";
const TODOS_KEY_PREFIX: &str = "todos_";

/// Returns the task list key owned by `identifier`.
pub fn todos_key(identifier: &str) -> String {
    format!("{TODOS_KEY_PREFIX}{identifier}")
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a store backend or while encoding a record.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode record: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw string key/value storage, modelled on browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}
