//! Credential store contract and an in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{AuthError, SecretString};

/// Service name under which secrets live in the platform keyring.
pub const KEYRING_SERVICE: &str = "switchboard";

/// Secure key/value persistence for long-lived secrets.
///
/// Absence is a normal outcome: `read` returns `Ok(None)` and `delete`
/// returns `Ok(false)` when nothing is stored under `key`.
pub trait CredentialStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<SecretString>, AuthError>;

    fn write(&self, key: &str, secret: &SecretString) -> Result<(), AuthError>;

    fn delete(&self, key: &str) -> Result<bool, AuthError>;
}

/// Persistent store used when the caller configures none: the platform
/// keyring with the `os-keyring` feature, otherwise the per-user
/// credential file.
pub fn default_credential_store() -> Arc<dyn CredentialStore> {
    #[cfg(feature = "os-keyring")]
    {
        Arc::new(crate::KeyringCredentialStore::new(KEYRING_SERVICE))
    }
    #[cfg(not(feature = "os-keyring"))]
    {
        Arc::new(crate::FileCredentialStore::per_user())
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    secrets: Mutex<HashMap<String, SecretString>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn secrets(&self) -> Result<MutexGuard<'_, HashMap<String, SecretString>>, AuthError> {
        self.secrets
            .lock()
            .map_err(|_| AuthError::storage("credential store lock poisoned"))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn read(&self, key: &str) -> Result<Option<SecretString>, AuthError> {
        Ok(self.secrets()?.get(key).cloned())
    }

    fn write(&self, key: &str, secret: &SecretString) -> Result<(), AuthError> {
        if secret.is_empty() {
            return Err(AuthError::storage("refusing to store an empty secret"));
        }

        self.secrets()?.insert(key.to_string(), secret.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, AuthError> {
        Ok(self.secrets()?.remove(key).is_some())
    }
}
