//! Provider error kinds and error value helpers.
//!
//! ```rust
//! use sprovider::{ProviderError, ProviderErrorKind};
//!
//! let error = ProviderError::http(429, "{\"error\":\"rate limited\"}");
//! assert_eq!(error.kind, ProviderErrorKind::Http);
//! assert_eq!(error.status, Some(429));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use sauth::{AuthError, AuthErrorKind, DeviceCodeInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Configuration,
    /// Interactive sign-in is needed; `challenge` holds the device code.
    AuthRequired,
    Authentication,
    /// Non-success HTTP status; `status` and `body` are populated.
    Http,
    Unsupported,
    InvalidRequest,
    InvalidResponse,
    Timeout,
    Transport,
    Cancelled,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<String>,
    pub challenge: Option<DeviceCodeInfo>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            challenge: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Configuration, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message)
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            status: Some(status),
            message: format!("provider returned HTTP {status}: {}", preview(&body)),
            body: Some(body),
            ..Self::new(ProviderErrorKind::Http, "")
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unsupported, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidResponse, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Cancelled, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }

    pub fn is_auth_required(&self) -> bool {
        self.kind == ProviderErrorKind::AuthRequired
    }
}

fn preview(body: &str) -> &str {
    const LIMIT: usize = 200;
    match body.char_indices().nth(LIMIT) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

impl From<AuthError> for ProviderError {
    fn from(error: AuthError) -> Self {
        let kind = match error.kind {
            AuthErrorKind::AuthRequired => ProviderErrorKind::AuthRequired,
            AuthErrorKind::AuthenticationFailed => ProviderErrorKind::Authentication,
            AuthErrorKind::Cancelled => ProviderErrorKind::Cancelled,
            AuthErrorKind::Transport => ProviderErrorKind::Transport,
            AuthErrorKind::InvalidResponse => ProviderErrorKind::InvalidResponse,
            AuthErrorKind::Storage => ProviderErrorKind::Other,
        };

        Self {
            challenge: error.challenge,
            ..Self::new(kind, error.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_full_body_and_truncates_message() {
        let body = "x".repeat(500);
        let error = ProviderError::http(500, body.clone());
        assert_eq!(error.body.as_deref(), Some(body.as_str()));
        assert!(error.message.len() < 300);
    }

    #[test]
    fn auth_required_converts_with_challenge() {
        let info = DeviceCodeInfo {
            device_code: "dc".to_string(),
            user_code: "CODE-1".to_string(),
            verification_uri: "https://github.com/login/device".to_string(),
            expires_in: 900,
            interval: 5,
        };
        let error = ProviderError::from(AuthError::auth_required(info));
        assert!(error.is_auth_required());
        assert_eq!(
            error.challenge.map(|challenge| challenge.user_code),
            Some("CODE-1".to_string())
        );
    }

    #[test]
    fn denied_sign_in_maps_to_authentication() {
        let error = ProviderError::from(AuthError::authentication_failed("access_denied"));
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
    }
}
