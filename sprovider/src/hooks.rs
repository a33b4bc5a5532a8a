//! Request lifecycle hooks for provider operations.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::{ProviderError, ProviderKind};

pub trait ProviderOperationHooks: Send + Sync {
    fn on_request_start(&self, _provider: ProviderKind, _operation: &str) {}

    fn on_success(&self, _provider: ProviderKind, _operation: &str, _elapsed: Duration) {}

    fn on_failure(
        &self,
        _provider: ProviderKind,
        _operation: &str,
        _elapsed: Duration,
        _error: &ProviderError,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}

/// Runs `operation` once, reporting start, success, or failure to `hooks`.
/// Failures are never retried.
pub async fn observe_operation<T, F>(
    provider: ProviderKind,
    operation: &str,
    hooks: &dyn ProviderOperationHooks,
    execute: F,
) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    hooks.on_request_start(provider, operation);
    let started = Instant::now();

    let result = execute.await;
    match &result {
        Ok(_) => hooks.on_success(provider, operation, started.elapsed()),
        Err(error) => hooks.on_failure(provider, operation, started.elapsed(), error),
    }

    result
}
