//! Metrics-based hooks for provider operations, sign-in, and function dispatch.
//!
//! ```rust
//! use sobserve::MetricsObservabilityHooks;
//! use sprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use sauth::{AuthError, AuthHooks, DeviceCodeInfo};
use sprovider::{ProviderError, ProviderKind, ProviderOperationHooks};
use stooling::{FunctionHooks, ToolError};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_request_start(&self, provider: ProviderKind, operation: &str) {
        metrics::counter!(
            "switchboard_provider_request_start_total",
            "provider" => provider.as_str(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_success(&self, provider: ProviderKind, operation: &str, elapsed: Duration) {
        metrics::counter!(
            "switchboard_provider_success_total",
            "provider" => provider.as_str(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "switchboard_provider_duration_seconds",
            "provider" => provider.as_str(),
            "operation" => operation.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_failure(
        &self,
        provider: ProviderKind,
        operation: &str,
        elapsed: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "switchboard_provider_failure_total",
            "provider" => provider.as_str(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "switchboard_provider_duration_seconds",
            "provider" => provider.as_str(),
            "operation" => operation.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl AuthHooks for MetricsObservabilityHooks {
    fn on_device_code_issued(&self, _info: &DeviceCodeInfo) {
        metrics::counter!("switchboard_auth_device_code_issued_total").increment(1);
    }

    fn on_poll_attempt(&self, _attempt: u32, _wait: Duration) {
        metrics::counter!("switchboard_auth_poll_attempt_total").increment(1);
    }

    fn on_slow_down(&self, _new_interval: u64) {
        metrics::counter!("switchboard_auth_slow_down_total").increment(1);
    }

    fn on_authorized(&self, attempts: u32) {
        metrics::counter!("switchboard_auth_authorized_total").increment(1);
        metrics::histogram!("switchboard_auth_polls_per_authorization").record(attempts as f64);
    }

    fn on_failure(&self, error: &AuthError) {
        metrics::counter!(
            "switchboard_auth_failure_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_store_write_failed(&self, _key: &str, _error: &AuthError) {
        metrics::counter!("switchboard_auth_store_write_failed_total").increment(1);
    }
}

impl FunctionHooks for MetricsObservabilityHooks {
    fn on_dispatch_start(&self, function: &str) {
        metrics::counter!(
            "switchboard_function_dispatch_start_total",
            "function" => function.to_string()
        )
        .increment(1);
    }

    fn on_dispatch_success(&self, function: &str, elapsed: Duration) {
        metrics::counter!(
            "switchboard_function_dispatch_success_total",
            "function" => function.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "switchboard_function_dispatch_duration_seconds",
            "function" => function.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_dispatch_failure(&self, function: &str, error: &ToolError, elapsed: Duration) {
        metrics::counter!(
            "switchboard_function_dispatch_failure_total",
            "function" => function.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "switchboard_function_dispatch_duration_seconds",
            "function" => function.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}
