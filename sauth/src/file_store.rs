//! Filesystem credential store.
//!
//! Lower-assurance fallback for hosts without a native secret service: the
//! secret is kept as plain JSON protected only by file permissions (owner
//! read/write on unix). Prefer `KeyringCredentialStore` when it is available.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::{AuthError, CredentialStore, SecretString};

const CONFIG_DIR_NAME: &str = "switchboard";
const CREDENTIAL_FILE_NAME: &str = "credentials.json";

/// `<config dir>/switchboard/credentials.json`, falling back to the home
/// directory and then the working directory.
pub fn default_credential_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CREDENTIAL_FILE_NAME)
}

#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn per_user() -> Self {
        Self::new(default_credential_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<PersistedSecrets, AuthError> {
        if !self.path.exists() {
            return Ok(PersistedSecrets::default());
        }

        let bytes = fs::read(&self.path).map_err(|error| {
            AuthError::storage(format!("failed to read credential file: {error}"))
        })?;
        serde_json::from_slice(&bytes).map_err(|error| {
            AuthError::storage(format!("failed to deserialize credential file: {error}"))
        })
    }

    fn save(&self, secrets: &PersistedSecrets) -> Result<(), AuthError> {
        let bytes = serde_json::to_vec_pretty(secrets).map_err(|error| {
            AuthError::storage(format!("failed to serialize credential file: {error}"))
        })?;
        write_atomic(&self.path, &bytes)
    }
}

impl CredentialStore for FileCredentialStore {
    fn read(&self, key: &str) -> Result<Option<SecretString>, AuthError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AuthError::storage("credential file lock poisoned"))?;
        Ok(self.load()?.entries.get(key).map(SecretString::new))
    }

    fn write(&self, key: &str, secret: &SecretString) -> Result<(), AuthError> {
        if secret.is_empty() {
            return Err(AuthError::storage("refusing to store an empty secret"));
        }

        let _guard = self
            .lock
            .lock()
            .map_err(|_| AuthError::storage("credential file lock poisoned"))?;
        let mut secrets = self.load()?;
        secrets
            .entries
            .insert(key.to_string(), secret.expose().to_string());
        self.save(&secrets)
    }

    fn delete(&self, key: &str) -> Result<bool, AuthError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AuthError::storage("credential file lock poisoned"))?;
        let mut secrets = self.load()?;
        if secrets.entries.remove(key).is_none() {
            return Ok(false);
        }

        self.save(&secrets)?;
        Ok(true)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSecrets {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AuthError> {
    let Some(parent) = path.parent() else {
        return Err(AuthError::storage(
            "credential file missing parent directory",
        ));
    };
    fs::create_dir_all(parent).map_err(|error| {
        AuthError::storage(format!("failed to create parent directory: {error}"))
    })?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|error| {
        AuthError::storage(format!("failed to write temporary credential file: {error}"))
    })?;
    restrict_permissions(&tmp)?;

    fs::rename(&tmp, path).map_err(|error| {
        AuthError::storage(format!("failed to finalize credential file: {error}"))
    })
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), AuthError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|error| {
        AuthError::storage(format!("failed to restrict credential file permissions: {error}"))
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), AuthError> {
    Ok(())
}
