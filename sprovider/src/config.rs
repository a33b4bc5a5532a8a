//! Builder-style provider configuration.
//!
//! ```rust
//! use sprovider::{ProviderConfig, ProviderErrorKind, ProviderKind};
//!
//! let config = ProviderConfig::new(ProviderKind::DirectEndpoint, "gpt-4o");
//! let err = config.validate().expect_err("direct endpoint needs a URL");
//! assert_eq!(err.kind, ProviderErrorKind::Configuration);
//!
//! let config = config
//!     .with_endpoint("https://contoso.openai.azure.com")
//!     .with_token("azure-api-key");
//! assert!(config.validate().is_ok());
//! ```

use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sauth::{
    AuthHooks, CredentialStore, DeviceFlowConfig, NoopAuthHooks, SecretString, SignInCallback,
    default_credential_store,
};

use crate::{NoopOperationHooks, ProviderError, ProviderKind, ProviderOperationHooks};

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);
pub const DEFAULT_USER_AGENT: &str = concat!("switchboard/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: String,
    /// Base URL. Required for `DirectEndpoint`, an override for the others.
    pub endpoint: Option<String>,
    pub token: Option<SecretString>,
    pub user_agent: String,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub api_version: Option<String>,
    pub token_file: Option<PathBuf>,
    /// Whether the token chain may shell out to `gh auth token`.
    pub use_cli_token: bool,
    pub timeout: Duration,
    pub sign_in: Option<SignInCallback>,
    pub device_flow: DeviceFlowConfig,
    /// Where the device-flow OAuth token is exchanged for a session token.
    pub session_token_url: Option<String>,
    pub credential_store: Option<Arc<dyn CredentialStore>>,
    pub hooks: Arc<dyn ProviderOperationHooks>,
    pub auth_hooks: Arc<dyn AuthHooks>,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            kind,
            model: model.into(),
            endpoint: None,
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: None,
            api_version: None,
            token_file: None,
            use_cli_token: true,
            timeout: DEFAULT_TIMEOUT,
            sign_in: None,
            device_flow: DeviceFlowConfig::default(),
            session_token_url: None,
            credential_store: None,
            hooks: Arc::new(NoopOperationHooks),
            auth_hooks: Arc::new(NoopAuthHooks),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::new(token));
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn with_token_file(mut self, token_file: impl Into<PathBuf>) -> Self {
        self.token_file = Some(token_file.into());
        self
    }

    pub fn without_cli_token(mut self) -> Self {
        self.use_cli_token = false;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sign_in(mut self, sign_in: SignInCallback) -> Self {
        self.sign_in = Some(sign_in);
        self
    }

    pub fn with_device_flow(mut self, device_flow: DeviceFlowConfig) -> Self {
        self.device_flow = device_flow;
        self
    }

    pub fn with_session_token_url(mut self, url: impl Into<String>) -> Self {
        self.session_token_url = Some(url.into());
        self
    }

    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_auth_hooks(mut self, hooks: Arc<dyn AuthHooks>) -> Self {
        self.auth_hooks = hooks;
        self
    }

    /// Falls back to the persistent per-user store when none was configured.
    pub fn credential_store_or_default(&self) -> Arc<dyn CredentialStore> {
        self.credential_store
            .clone()
            .unwrap_or_else(default_credential_store)
    }

    pub fn endpoint_trimmed(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(|endpoint| endpoint.trim().trim_end_matches('/'))
            .filter(|endpoint| !endpoint.is_empty())
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::configuration("model must not be empty"));
        }

        if self.kind == ProviderKind::DirectEndpoint && self.endpoint_trimmed().is_none() {
            return Err(ProviderError::configuration(
                "direct-endpoint provider requires an endpoint URL",
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ProviderError::configuration(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        if self.max_output_tokens == Some(0) {
            return Err(ProviderError::configuration(
                "max_output_tokens must be greater than zero",
            ));
        }

        if self.timeout.is_zero() {
            return Err(ProviderError::configuration("timeout must be non-zero"));
        }

        Ok(())
    }
}

impl Debug for ProviderConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("token", &self.token)
            .field("user_agent", &self.user_agent)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("api_version", &self.api_version)
            .field("token_file", &self.token_file)
            .field("timeout", &self.timeout)
            .field("has_sign_in", &self.sign_in.is_some())
            .field("device_flow", &self.device_flow)
            .finish_non_exhaustive()
    }
}
