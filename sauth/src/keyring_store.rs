//! Platform secret-service store (macOS Keychain, Windows Credential Manager,
//! Linux Secret Service) via the `keyring` crate.

use crate::{AuthError, CredentialStore, SecretString};

#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service: String,
}

impl KeyringCredentialStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, AuthError> {
        keyring::Entry::new(&self.service, key)
            .map_err(|error| AuthError::storage(format!("failed to open keyring entry: {error}")))
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn read(&self, key: &str) -> Result<Option<SecretString>, AuthError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(SecretString::new(value))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::storage(format!(
                "failed to read keyring entry: {error}"
            ))),
        }
    }

    fn write(&self, key: &str, secret: &SecretString) -> Result<(), AuthError> {
        self.entry(key)?
            .set_password(secret.expose())
            .map_err(|error| AuthError::storage(format!("failed to write keyring entry: {error}")))
    }

    fn delete(&self, key: &str) -> Result<bool, AuthError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(error) => Err(AuthError::storage(format!(
                "failed to delete keyring entry: {error}"
            ))),
        }
    }
}
