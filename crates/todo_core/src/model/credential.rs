//! Local credential store.
//!
//! Secrets are kept and compared as plaintext: accounts only gate which
//! task list is shown on this device.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier -> secret map persisted under the `users` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialStore {
    entries: BTreeMap<String, String>,
}

impl CredentialStore {
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Adds a new account. Returns `false` and leaves the existing secret
    /// untouched when `identifier` is already registered.
    pub fn register(&mut self, identifier: &str, secret: &str) -> bool {
        if self.contains(identifier) {
            return false;
        }
        self.entries
            .insert(identifier.to_owned(), secret.to_owned());
        true
    }

    /// Exact, case-sensitive match of a registered identifier and secret.
    pub fn verify(&self, identifier: &str, secret: &str) -> bool {
        self.entries
            .get(identifier)
            .is_some_and(|stored| stored == secret)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::CredentialStore;

    #[test]
    fn register_rejects_duplicate_and_keeps_first_secret() {
        let mut store = CredentialStore::default();
        assert!(store.register("u", "p"));
        assert!(!store.register("u", "p2"));

        assert_eq!(store.len(), 1);
        assert!(store.verify("u", "p"));
        assert!(!store.verify("u", "p2"));
    }

    #[test]
    fn verify_is_case_sensitive() {
        let mut store = CredentialStore::default();
        store.register("a@x.com", "Secret");

        assert!(!store.verify("a@x.com", "secret"));
        assert!(!store.verify("A@x.com", "Secret"));
        assert!(!store.verify("nobody", "Secret"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut store = CredentialStore::default();
        store.register("a@x.com", "pw");

        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"a@x.com":"pw"}"#);
        let decoded: CredentialStore = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, store);
    }
}
