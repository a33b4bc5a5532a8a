//! Lifecycle hooks for function dispatch.

use std::time::Duration;

use crate::ToolError;

pub trait FunctionHooks: Send + Sync {
    fn on_dispatch_start(&self, _function: &str) {}

    fn on_dispatch_success(&self, _function: &str, _elapsed: Duration) {}

    fn on_dispatch_failure(&self, _function: &str, _error: &ToolError, _elapsed: Duration) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFunctionHooks;

impl FunctionHooks for NoopFunctionHooks {}
