//! Device-code flow records and the cached session token.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::SecretString;

pub const DEFAULT_AUTH_SERVER: &str = "https://github.com";
pub const DEFAULT_CLIENT_ID: &str = "Iv1.b507a08c87ecfe98";
pub const DEFAULT_SCOPE: &str = "read:user";
pub const DEFAULT_CREDENTIAL_KEY: &str = "switchboard.github.oauth";
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFlowConfig {
    pub auth_server: String,
    pub client_id: String,
    pub scope: String,
    /// Logical name of the persisted secret in the credential store.
    pub credential_key: String,
}

impl Default for DeviceFlowConfig {
    fn default() -> Self {
        Self {
            auth_server: DEFAULT_AUTH_SERVER.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            credential_key: DEFAULT_CREDENTIAL_KEY.to_string(),
        }
    }
}

impl DeviceFlowConfig {
    pub fn with_auth_server(mut self, auth_server: impl Into<String>) -> Self {
        self.auth_server = auth_server.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_credential_key(mut self, credential_key: impl Into<String>) -> Self {
        self.credential_key = credential_key.into();
        self
    }

    pub fn device_code_url(&self) -> String {
        format!(
            "{}/login/device/code",
            self.auth_server.trim_end_matches('/')
        )
    }

    pub fn access_token_url(&self) -> String {
        format!(
            "{}/login/oauth/access_token",
            self.auth_server.trim_end_matches('/')
        )
    }
}

/// Payload returned by the device-code endpoint and shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCodeInfo {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_expires_in() -> u64 {
    900
}

fn default_interval() -> u64 {
    5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCodeStatus {
    Requested,
    Polling,
    Authorized,
    Denied,
    Expired,
    Error,
}

impl DeviceCodeStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Authorized | Self::Denied | Self::Expired | Self::Error
        )
    }
}

/// One device-code attempt. `info.interval` is the live poll interval and
/// only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCodeState {
    pub info: DeviceCodeInfo,
    pub status: DeviceCodeStatus,
}

impl DeviceCodeState {
    pub fn requested(info: DeviceCodeInfo) -> Self {
        Self {
            info,
            status: DeviceCodeStatus::Requested,
        }
    }

    pub fn interval(&self) -> u64 {
        self.info.interval
    }
}

/// Token-endpoint reply: either `access_token` or an `error` code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenPollResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl TokenPollResponse {
    pub fn pending() -> Self {
        Self::error("authorization_pending")
    }

    pub fn error(code: impl Into<String>) -> Self {
        Self {
            error: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }
}

/// Short-lived session token derived from the long-lived OAuth token.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub token: SecretString,
    /// Expiry as unix epoch seconds.
    pub expires_at: u64,
    pub refresh_in: u64,
}

impl CachedToken {
    pub fn new(token: impl Into<String>, expires_at: u64, refresh_in: u64) -> Self {
        Self {
            token: SecretString::new(token),
            expires_at,
            refresh_in,
        }
    }

    pub fn is_expired_at(&self, now_epoch_secs: u64) -> bool {
        now_epoch_secs >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(epoch_now())
    }
}

pub(crate) fn epoch_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builds_endpoint_urls_without_double_slashes() {
        let config = DeviceFlowConfig::default().with_auth_server("https://auth.example/");
        assert_eq!(
            config.device_code_url(),
            "https://auth.example/login/device/code"
        );
        assert_eq!(
            config.access_token_url(),
            "https://auth.example/login/oauth/access_token"
        );
    }

    #[test]
    fn device_code_info_applies_defaults_for_missing_timing_fields() {
        let info: DeviceCodeInfo = serde_json::from_str(
            r#"{"device_code":"dc","user_code":"UC-1","verification_uri":"https://x/device"}"#,
        )
        .expect("payload should parse");
        assert_eq!(info.expires_in, 900);
        assert_eq!(info.interval, 5);
    }

    #[test]
    fn cached_token_expiry_is_inclusive() {
        let token = CachedToken::new("tid=abc", 1_000, 1_500);
        assert!(!token.is_expired_at(999));
        assert!(token.is_expired_at(1_000));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!DeviceCodeStatus::Requested.is_terminal());
        assert!(!DeviceCodeStatus::Polling.is_terminal());
        assert!(DeviceCodeStatus::Authorized.is_terminal());
        assert!(DeviceCodeStatus::Expired.is_terminal());
    }
}
