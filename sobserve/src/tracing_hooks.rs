//! Tracing-based hooks for provider operations, sign-in, and function dispatch.
//!
//! ```rust
//! use sauth::AuthHooks;
//! use sobserve::TracingObservabilityHooks;
//!
//! fn accepts_auth_hooks(_hooks: &dyn AuthHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_auth_hooks(&hooks);
//! ```

use std::time::Duration;

use sauth::{AuthError, AuthHooks, DeviceCodeInfo};
use sprovider::{ProviderError, ProviderKind, ProviderOperationHooks};
use stooling::{FunctionHooks, ToolError};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_request_start(&self, provider: ProviderKind, operation: &str) {
        tracing::info!(
            phase = "provider",
            event = "request_start",
            provider = %provider,
            operation
        );
    }

    fn on_success(&self, provider: ProviderKind, operation: &str, elapsed: Duration) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_failure(
        &self,
        provider: ProviderKind,
        operation: &str,
        elapsed: Duration,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            status = error.status,
            error = %error
        );
    }
}

impl AuthHooks for TracingObservabilityHooks {
    fn on_device_code_issued(&self, info: &DeviceCodeInfo) {
        tracing::info!(
            phase = "auth",
            event = "device_code_issued",
            verification_uri = %info.verification_uri,
            expires_in = info.expires_in,
            interval = info.interval
        );
    }

    fn on_poll_attempt(&self, attempt: u32, wait: Duration) {
        tracing::debug!(
            phase = "auth",
            event = "poll_attempt",
            attempt,
            wait_ms = wait.as_millis() as u64
        );
    }

    fn on_slow_down(&self, new_interval: u64) {
        tracing::warn!(phase = "auth", event = "slow_down", interval = new_interval);
    }

    fn on_authorized(&self, attempts: u32) {
        tracing::info!(phase = "auth", event = "authorized", attempts);
    }

    fn on_failure(&self, error: &AuthError) {
        tracing::error!(
            phase = "auth",
            event = "failure",
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_store_write_failed(&self, key: &str, error: &AuthError) {
        tracing::warn!(
            phase = "auth",
            event = "store_write_failed",
            key,
            error = %error
        );
    }
}

impl FunctionHooks for TracingObservabilityHooks {
    fn on_dispatch_start(&self, function: &str) {
        tracing::info!(phase = "tooling", event = "dispatch_start", function);
    }

    fn on_dispatch_success(&self, function: &str, elapsed: Duration) {
        tracing::info!(
            phase = "tooling",
            event = "dispatch_success",
            function,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_dispatch_failure(&self, function: &str, error: &ToolError, elapsed: Duration) {
        tracing::error!(
            phase = "tooling",
            event = "dispatch_failure",
            function,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}
