use std::time::Duration;

use crate::{AuthError, DeviceCodeInfo};

/// Lifecycle callbacks for the device-code flow and credential persistence.
pub trait AuthHooks: Send + Sync {
    fn on_device_code_issued(&self, _info: &DeviceCodeInfo) {}

    fn on_poll_attempt(&self, _attempt: u32, _wait: Duration) {}

    fn on_slow_down(&self, _new_interval: u64) {}

    fn on_authorized(&self, _attempts: u32) {}

    fn on_failure(&self, _error: &AuthError) {}

    fn on_store_write_failed(&self, _key: &str, _error: &AuthError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuthHooks;

impl AuthHooks for NoopAuthHooks {}
