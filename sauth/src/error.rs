//! Authentication and credential-store errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::DeviceCodeInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Sign-in is needed and the caller asked for a non-interactive attempt.
    AuthRequired,
    /// The authorization server denied or rejected the attempt.
    AuthenticationFailed,
    Cancelled,
    Transport,
    InvalidResponse,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
    /// Device-code payload the caller can show before retrying.
    pub challenge: Option<DeviceCodeInfo>,
    /// Raw `error` code returned by the authorization server.
    pub server_code: Option<String>,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            challenge: None,
            server_code: None,
        }
    }

    pub fn auth_required(challenge: DeviceCodeInfo) -> Self {
        let message = format!(
            "sign-in required: enter code {} at {}",
            challenge.user_code, challenge.verification_uri
        );
        Self {
            challenge: Some(challenge),
            ..Self::new(AuthErrorKind::AuthRequired, message)
        }
    }

    pub fn authentication_failed(server_code: impl Into<String>) -> Self {
        let server_code = server_code.into();
        Self {
            message: format!("authorization server rejected the device code: {server_code}"),
            server_code: Some(server_code),
            ..Self::new(AuthErrorKind::AuthenticationFailed, "")
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Cancelled, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Transport, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidResponse, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Storage, message)
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for AuthError {}
