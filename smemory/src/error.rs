//! Vector-store and semantic-index errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

use sprovider::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryErrorKind {
    /// Embedding length differs from the length fixed by the first insert.
    DimensionMismatch,
    InvalidRequest,
    /// The embedding provider failed; see `provider_error`.
    Provider,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryError {
    pub kind: MemoryErrorKind,
    pub message: String,
    pub provider_error: Option<ProviderError>,
}

impl MemoryError {
    pub fn new(kind: MemoryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider_error: None,
        }
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(
            MemoryErrorKind::DimensionMismatch,
            format!("expected embedding of length {expected}, got {actual}"),
        )
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(MemoryErrorKind::InvalidRequest, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(MemoryErrorKind::Other, message)
    }
}

impl Display for MemoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for MemoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.provider_error
            .as_ref()
            .map(|error| error as &(dyn Error + 'static))
    }
}

impl From<ProviderError> for MemoryError {
    fn from(error: ProviderError) -> Self {
        Self {
            message: error.to_string(),
            provider_error: Some(error),
            ..Self::new(MemoryErrorKind::Provider, "")
        }
    }
}
