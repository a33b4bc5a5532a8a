//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use sprovider::{ProviderError, ProviderErrorKind};
use stooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Configuration,
    InvalidRequest,
    /// Device-code sign-in is pending; the provider error carries the code.
    AuthRequired,
    Provider,
    Unsupported,
    Cancelled,
    Tooling,
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub provider_error: Option<ProviderError>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider_error: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Configuration, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Unsupported, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Tooling, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    /// HTTP status of the underlying provider failure, if any.
    pub fn status(&self) -> Option<u16> {
        self.provider_error.as_ref().and_then(|error| error.status)
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.provider_error
            .as_ref()
            .map(|error| error as &(dyn Error + 'static))
    }
}

impl From<ProviderError> for ChatError {
    fn from(error: ProviderError) -> Self {
        let kind = match error.kind {
            ProviderErrorKind::Configuration => ChatErrorKind::Configuration,
            ProviderErrorKind::AuthRequired => ChatErrorKind::AuthRequired,
            ProviderErrorKind::Unsupported => ChatErrorKind::Unsupported,
            ProviderErrorKind::InvalidRequest => ChatErrorKind::InvalidRequest,
            ProviderErrorKind::Cancelled => ChatErrorKind::Cancelled,
            _ => ChatErrorKind::Provider,
        };

        Self {
            kind,
            message: error.message.clone(),
            provider_error: Some(error),
        }
    }
}

impl From<ToolError> for ChatError {
    fn from(error: ToolError) -> Self {
        Self::tooling(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_http_error_keeps_status() {
        let error = ChatError::from(ProviderError::http(502, "bad gateway"));
        assert_eq!(error.kind, ChatErrorKind::Provider);
        assert_eq!(error.status(), Some(502));
    }

    #[test]
    fn unsupported_and_configuration_keep_their_kind() {
        assert_eq!(
            ChatError::from(ProviderError::unsupported("no vision")).kind,
            ChatErrorKind::Unsupported
        );
        assert_eq!(
            ChatError::from(ProviderError::configuration("no endpoint")).kind,
            ChatErrorKind::Configuration
        );
    }
}
