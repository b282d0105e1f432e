//! Account gating over the local credential store.
//!
//! # Responsibility
//! - Register and verify local accounts.
//! - Persist the active identifier under `todoUser` and restore it at start.
//! - Load, reset or clear the task list whenever the active user changes.
//!
//! # Invariants
//! - Rejected signup/login leaves session, credentials and tasks untouched.
//! - The active user and the in-memory list switch together, and only after
//!   every write for the switch has succeeded.
//! - Logout never deletes a user's persisted task list.

use crate::model::credential::CredentialStore;
use crate::service::task_service::TaskListStore;
use crate::store::{records, KeyValueStore, StoreError, StoreResult, SESSION_KEY, USERS_KEY};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Outcome of a rejected signup or login.
#[derive(Debug)]
pub enum SessionError {
    /// Signup for an identifier that is already registered.
    DuplicateIdentifier,
    /// Unknown identifier or secret mismatch. The two are not distinguished.
    InvalidCredentials,
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateIdentifier => write!(f, "identifier is already registered"),
            Self::InvalidCredentials => write!(f, "invalid identifier or secret"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::DuplicateIdentifier | Self::InvalidCredentials => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Holds the active user identifier, if any.
#[derive(Debug, Default)]
pub struct SessionManager {
    active: Option<String>,
}

impl SessionManager {
    pub fn active_user(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Registers `identifier` and logs it in with a fresh, empty task list.
    ///
    /// Any list previously persisted for `identifier` is overwritten. When a
    /// later write fails the new account is withdrawn again and the current
    /// session stays as it was.
    pub fn signup<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        tasks: &mut TaskListStore,
        identifier: &str,
        secret: &str,
    ) -> SessionResult<()> {
        let previous: CredentialStore = records::load_or_default(store, USERS_KEY)?;
        let mut credentials = previous.clone();
        if !credentials.register(identifier, secret) {
            warn!("event=signup module=session status=rejected reason=duplicate_identifier");
            return Err(SessionError::DuplicateIdentifier);
        }
        records::save(store, USERS_KEY, &credentials)?;

        let committed = TaskListStore::reset(store, identifier)
            .and_then(|()| records::save(store, SESSION_KEY, identifier));
        if let Err(err) = committed {
            if let Err(rollback_err) = records::save(store, USERS_KEY, &previous) {
                warn!(
                    "event=signup module=session status=error reason=rollback_failed error={rollback_err}"
                );
            }
            warn!("event=signup module=session status=error error={err}");
            return Err(err.into());
        }

        tasks.install(Vec::new());
        self.active = Some(identifier.to_owned());
        info!(
            "event=signup module=session status=ok account_count={}",
            credentials.len()
        );
        Ok(())
    }

    /// Logs in with an exact identifier/secret match and loads that user's list.
    ///
    /// Storage is written before memory changes, so a failed login leaves
    /// the active user paired with their own list.
    pub fn login<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        tasks: &mut TaskListStore,
        identifier: &str,
        secret: &str,
    ) -> SessionResult<()> {
        let credentials: CredentialStore = records::load_or_default(store, USERS_KEY)?;
        if !credentials.verify(identifier, secret) {
            warn!("event=login module=session status=rejected reason=invalid_credentials");
            return Err(SessionError::InvalidCredentials);
        }

        let loaded = TaskListStore::fetch(store, identifier)?;
        records::save(store, SESSION_KEY, identifier)?;

        tasks.install(loaded);
        self.active = Some(identifier.to_owned());
        info!("event=login module=session status=ok");
        Ok(())
    }

    /// Ends the session and drops the in-memory list.
    ///
    /// In-memory state is cleared even when removing the pointer fails.
    pub fn logout<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        tasks: &mut TaskListStore,
    ) -> StoreResult<()> {
        self.active = None;
        tasks.clear();
        store.remove(SESSION_KEY)?;
        info!("event=logout module=session status=ok");
        Ok(())
    }

    /// Re-activates the persisted session pointer, if one exists.
    ///
    /// Returns whether a session was restored. A missing or unreadable
    /// pointer leaves the manager logged out.
    pub fn restore_session<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        tasks: &mut TaskListStore,
    ) -> StoreResult<bool> {
        let persisted: Option<String> = records::load_or_default(store, SESSION_KEY)?;
        let Some(identifier) = persisted else {
            info!("event=session_restore module=session status=ok restored=false");
            return Ok(false);
        };

        let loaded = TaskListStore::fetch(store, &identifier)?;
        tasks.install(loaded);
        self.active = Some(identifier);
        info!("event=session_restore module=session status=ok restored=true");
        Ok(true)
    }
}
