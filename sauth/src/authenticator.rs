//! Device-code authenticator: issue, poll, cache and persist the OAuth token.

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    AuthError, AuthHooks, CredentialStore, DeviceCodeInfo, DeviceCodeState, DeviceCodeStatus,
    DeviceCodeTransport, DeviceFlowConfig, HttpDeviceCodeTransport, NoopAuthHooks, SecretString,
};

const SLOW_DOWN_STEP_SECS: u64 = 5;

/// Invoked with the device-code payload so a UI can show the user code.
pub type SignInCallback = Arc<dyn Fn(&DeviceCodeInfo) + Send + Sync>;

pub struct DeviceCodeAuthenticator {
    config: DeviceFlowConfig,
    transport: Arc<dyn DeviceCodeTransport>,
    store: Arc<dyn CredentialStore>,
    hooks: Arc<dyn AuthHooks>,
    sign_in: Option<SignInCallback>,
    cached: Mutex<Option<SecretString>>,
}

impl DeviceCodeAuthenticator {
    pub fn new(config: DeviceFlowConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            config,
            transport: Arc::new(HttpDeviceCodeTransport::default()),
            store,
            hooks: Arc::new(NoopAuthHooks),
            sign_in: None,
            cached: Mutex::new(None),
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn DeviceCodeTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn AuthHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_sign_in(mut self, sign_in: SignInCallback) -> Self {
        self.sign_in = Some(sign_in);
        self
    }

    pub fn config(&self) -> &DeviceFlowConfig {
        &self.config
    }

    pub fn has_sign_in(&self) -> bool {
        self.sign_in.is_some()
    }

    /// Requests a fresh device code. The returned state is `Requested`.
    pub async fn start_authentication(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DeviceCodeState, AuthError> {
        let requested = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AuthError::cancelled("device-code request was cancelled")),
            requested = self.transport.request_device_code(&self.config) => requested,
        };
        let info = match requested {
            Ok(info) => info,
            Err(error) => {
                self.hooks.on_failure(&error);
                return Err(error);
            }
        };

        tracing::info!(
            phase = "auth",
            event = "device_code_issued",
            user_code = %info.user_code,
            verification_uri = %info.verification_uri,
            interval = info.interval
        );
        self.hooks.on_device_code_issued(&info);

        Ok(DeviceCodeState::requested(info))
    }

    /// Polls the token endpoint until the user finishes, the server rejects
    /// the code, or `cancel` fires. Sleeps `interval + 1` seconds before each
    /// request.
    pub async fn poll_for_token(
        &self,
        state: &mut DeviceCodeState,
        cancel: &CancellationToken,
    ) -> Result<SecretString, AuthError> {
        state.status = DeviceCodeStatus::Polling;
        let mut attempt = 0u32;

        loop {
            attempt = attempt.saturating_add(1);
            let wait = Duration::from_secs(state.info.interval.saturating_add(1));
            self.hooks.on_poll_attempt(attempt, wait);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancel_polling(state)),
                _ = tokio::time::sleep(wait) => {}
            }

            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancel_polling(state)),
                polled = self.transport.poll_access_token(&self.config, &state.info.device_code) => polled,
            };

            let response = match polled {
                Ok(response) => response,
                Err(error) => return Err(self.fail_polling(state, DeviceCodeStatus::Error, error)),
            };

            if let Some(token) = response
                .access_token
                .filter(|token| !token.trim().is_empty())
            {
                state.status = DeviceCodeStatus::Authorized;
                self.hooks.on_authorized(attempt);
                return Ok(SecretString::new(token));
            }

            match response.error.as_deref() {
                Some("authorization_pending") => {}
                Some("slow_down") => {
                    state.info.interval =
                        state.info.interval.saturating_add(SLOW_DOWN_STEP_SECS);
                    tracing::debug!(
                        phase = "auth",
                        event = "slow_down",
                        interval = state.info.interval
                    );
                    self.hooks.on_slow_down(state.info.interval);
                }
                Some("access_denied") => {
                    let error = AuthError::authentication_failed("access_denied");
                    return Err(self.fail_polling(state, DeviceCodeStatus::Denied, error));
                }
                Some(code) => {
                    let mut error = AuthError::authentication_failed(code);
                    if let Some(description) = response.error_description {
                        error.message = format!("{}: {description}", error.message);
                    }
                    return Err(self.fail_polling(state, DeviceCodeStatus::Error, error));
                }
                None => {
                    let error = AuthError::invalid_response(
                        "token endpoint returned neither a token nor an error code",
                    );
                    return Err(self.fail_polling(state, DeviceCodeStatus::Error, error));
                }
            }
        }
    }

    /// Polls an already issued device code, then caches and persists the token.
    pub async fn complete_authentication(
        &self,
        state: &mut DeviceCodeState,
        cancel: &CancellationToken,
    ) -> Result<SecretString, AuthError> {
        let token = self.poll_for_token(state, cancel).await?;
        self.persist(&token);
        *self.cached()? = Some(token.clone());
        Ok(token)
    }

    /// Returns the OAuth token from memory, then the credential store, then
    /// the interactive flow. Without a sign-in callback or when `interactive`
    /// is false the issued device code comes back as `AuthRequired`.
    pub async fn ensure_token(
        &self,
        interactive: bool,
        cancel: &CancellationToken,
    ) -> Result<SecretString, AuthError> {
        let cached = self.cached()?.clone();
        if let Some(token) = cached {
            return Ok(token);
        }

        match self.store.read(&self.config.credential_key) {
            Ok(Some(token)) if !token.is_empty() => {
                *self.cached()? = Some(token.clone());
                return Ok(token);
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(
                    phase = "auth",
                    event = "store_read_failed",
                    key = %self.config.credential_key,
                    error = %error
                );
            }
        }

        let mut state = self.start_authentication(cancel).await?;
        match (&self.sign_in, interactive) {
            (Some(sign_in), true) => {
                sign_in(&state.info);
                self.complete_authentication(&mut state, cancel).await
            }
            _ => {
                let error = AuthError::auth_required(state.info);
                self.hooks.on_failure(&error);
                Err(error)
            }
        }
    }

    /// Forgets the in-memory token and deletes the persisted one. Returns
    /// whether a stored secret existed.
    pub fn clear_token(&self) -> Result<bool, AuthError> {
        self.invalidate_cached()?;
        self.store.delete(&self.config.credential_key)
    }

    /// Drops the in-memory token only, e.g. after the server rejected it.
    pub fn invalidate_cached(&self) -> Result<(), AuthError> {
        *self.cached()? = None;
        Ok(())
    }

    fn persist(&self, token: &SecretString) {
        let key = &self.config.credential_key;
        if let Err(error) = self.store.write(key, token) {
            tracing::warn!(
                phase = "auth",
                event = "store_write_failed",
                key = %key,
                error = %error
            );
            self.hooks.on_store_write_failed(key, &error);
        }
    }

    fn cancel_polling(&self, state: &mut DeviceCodeState) -> AuthError {
        let error = AuthError::cancelled("device-code polling was cancelled");
        self.fail_polling(state, DeviceCodeStatus::Expired, error)
    }

    fn fail_polling(
        &self,
        state: &mut DeviceCodeState,
        status: DeviceCodeStatus,
        error: AuthError,
    ) -> AuthError {
        state.status = status;
        self.hooks.on_failure(&error);
        error
    }

    fn cached(&self) -> Result<MutexGuard<'_, Option<SecretString>>, AuthError> {
        self.cached
            .lock()
            .map_err(|_| AuthError::storage("token cache lock poisoned"))
    }
}

impl Debug for DeviceCodeAuthenticator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceCodeAuthenticator")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("has_sign_in", &self.sign_in.is_some())
            .finish_non_exhaustive()
    }
}
