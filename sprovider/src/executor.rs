//! The executor contract every provider variant implements.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::{ModelRequest, ProviderError, ProviderFuture, ProviderKind, VisionRequest};

pub trait ProviderExecutor: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model(&self) -> &str;

    /// Sends `request` once and returns the assistant text.
    fn complete<'a>(
        &'a self,
        request: ModelRequest,
        cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<String, ProviderError>>;

    fn complete_vision<'a>(
        &'a self,
        _request: VisionRequest,
        _cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        let kind = self.kind();
        Box::pin(async move {
            Err(ProviderError::unsupported(format!(
                "{kind} provider does not support image input"
            )))
        })
    }

    /// Never fails; providers fall back to a static list.
    fn list_models<'a>(&'a self, cancel: &'a CancellationToken) -> ProviderFuture<'a, Vec<String>>;

    fn embed<'a>(
        &'a self,
        _inputs: Vec<String>,
        _cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<Vec<Vec<f32>>, ProviderError>> {
        let kind = self.kind();
        Box::pin(async move {
            Err(ProviderError::unsupported(format!(
                "{kind} provider does not support embeddings"
            )))
        })
    }

    /// Obtains whatever long-lived credential the provider needs up front.
    fn ensure_credentials<'a>(
        &'a self,
        _interactive: bool,
        _cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async { Ok(()) })
    }

    /// Forgets cached and persisted credentials. Returns whether any existed.
    fn clear_credentials(&self) -> Result<bool, ProviderError> {
        Ok(false)
    }
}

/// Races `operation` against `cancel`.
pub(crate) async fn cancellable<T, F>(
    cancel: &CancellationToken,
    operation: F,
) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ProviderError::cancelled("provider request was cancelled")),
        result = operation => result,
    }
}
