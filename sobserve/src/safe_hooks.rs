use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use sauth::{AuthError, AuthHooks, DeviceCodeInfo};
use sprovider::{ProviderError, ProviderKind, ProviderOperationHooks};
use stooling::{FunctionHooks, ToolError};

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_request_start(&self, provider: ProviderKind, operation: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_request_start(provider, operation)
        }));
    }

    fn on_success(&self, provider: ProviderKind, operation: &str, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, elapsed)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderKind,
        operation: &str,
        elapsed: Duration,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, elapsed, error)
        }));
    }
}

pub struct SafeAuthHooks<H> {
    inner: H,
}

impl<H> SafeAuthHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> AuthHooks for SafeAuthHooks<H>
where
    H: AuthHooks,
{
    fn on_device_code_issued(&self, info: &DeviceCodeInfo) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_device_code_issued(info)));
    }

    fn on_poll_attempt(&self, attempt: u32, wait: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_poll_attempt(attempt, wait)));
    }

    fn on_slow_down(&self, new_interval: u64) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_slow_down(new_interval)));
    }

    fn on_authorized(&self, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_authorized(attempts)));
    }

    fn on_failure(&self, error: &AuthError) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_failure(error)));
    }

    fn on_store_write_failed(&self, key: &str, error: &AuthError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_store_write_failed(key, error)
        }));
    }
}

pub struct SafeFunctionHooks<H> {
    inner: H,
}

impl<H> SafeFunctionHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> FunctionHooks for SafeFunctionHooks<H>
where
    H: FunctionHooks,
{
    fn on_dispatch_start(&self, function: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_dispatch_start(function)));
    }

    fn on_dispatch_success(&self, function: &str, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_success(function, elapsed)
        }));
    }

    fn on_dispatch_failure(&self, function: &str, error: &ToolError, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_failure(function, error, elapsed)
        }));
    }
}
