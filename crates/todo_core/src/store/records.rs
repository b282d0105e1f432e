//! Typed JSON records on top of raw key/value strings.

use super::{KeyValueStore, StoreError, StoreResult, TODOS_KEY_PREFIX};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Reads and decodes the record under `key`.
///
/// Missing keys and malformed JSON both yield `T::default()`; the latter is
/// logged so corrupt state is visible without being fatal. Backend failures
/// are still returned.
pub fn load_or_default<T, S>(store: &S, key: &str) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(
                "event=record_read module=store status=degraded key_kind={} error={err}",
                key_kind(key)
            );
            Ok(T::default())
        }
    }
}

/// Encodes `value` and overwrites the record under `key`.
pub fn save<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(StoreError::Encode)?;
    store.set(key, &raw)
}

// Task list keys embed the user identifier; only the kind is logged.
fn key_kind(key: &str) -> &str {
    if key.starts_with(TODOS_KEY_PREFIX) {
        "todos"
    } else {
        key
    }
}
