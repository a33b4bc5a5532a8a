//! Credential persistence and the OAuth device-code flow.
//!
//! ```rust
//! use sauth::{CredentialStore, InMemoryCredentialStore, SecretString};
//!
//! let store = InMemoryCredentialStore::new();
//! store.write("github.oauth", &SecretString::new("gho_example")).expect("write");
//! let token = store.read("github.oauth").expect("read").expect("token present");
//! assert_eq!(token.expose(), "gho_example");
//! ```

mod authenticator;
mod device_code;
mod error;
mod file_store;
mod hooks;
#[cfg(feature = "os-keyring")]
mod keyring_store;
mod secret;
mod store;
mod transport;

pub mod prelude {
    pub use crate::{
        AuthError, AuthErrorKind, AuthHooks, CachedToken, CredentialStore,
        DeviceCodeAuthenticator, DeviceCodeInfo, DeviceCodeState, DeviceCodeStatus,
        DeviceFlowConfig, FileCredentialStore, InMemoryCredentialStore, NoopAuthHooks,
        SecretString, SignInCallback,
    };
}

pub use authenticator::{DeviceCodeAuthenticator, SignInCallback};
pub use device_code::{
    CachedToken, DeviceCodeInfo, DeviceCodeState, DeviceCodeStatus, DeviceFlowConfig,
    TokenPollResponse,
};
pub use error::{AuthError, AuthErrorKind};
pub use file_store::{FileCredentialStore, default_credential_path};
pub use hooks::{AuthHooks, NoopAuthHooks};
#[cfg(feature = "os-keyring")]
pub use keyring_store::KeyringCredentialStore;
pub use secret::SecretString;
pub use store::{
    CredentialStore, InMemoryCredentialStore, KEYRING_SERVICE, default_credential_store,
};
pub use transport::{DEFAULT_REQUEST_TIMEOUT, DeviceCodeTransport, HttpDeviceCodeTransport};
