//! Executor for the chat service behind the OAuth device-code sign-in.
//!
//! The long-lived OAuth token comes from [`DeviceCodeAuthenticator`]; each
//! request uses a short-lived session token exchanged from it and refreshed
//! once `expires_at` has passed.

use std::sync::{Arc, Mutex, MutexGuard};

use sauth::{CachedToken, DeviceCodeAuthenticator, HttpDeviceCodeTransport, SecretString};
use scommon::GenerationOptions;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::executor::cancellable;
use crate::wire::{self, ChatCompletionPayload, SessionTokenResponse};
use crate::{
    HttpRequest, HttpTransport, ModelRequest, ProviderConfig, ProviderError, ProviderExecutor,
    ProviderFuture, ProviderKind, ProviderOperationHooks, VisionRequest, observe_operation,
};

use super::send_for_body;

pub const DEFAULT_COPILOT_API_BASE: &str = "https://api.githubcopilot.com";
pub const DEFAULT_SESSION_TOKEN_URL: &str = "https://api.github.com/copilot_internal/v2/token";

const INTEGRATION_ID: &str = "vscode-chat";
const EDITOR_VERSION: &str = "vscode/1.95.0";

const FALLBACK_MODELS: &[&str] = &[
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4.1",
    "claude-3.5-sonnet",
    "o3-mini",
];

pub struct DeviceFlowExecutor {
    api_base: String,
    session_token_url: String,
    model: String,
    user_agent: String,
    temperature: f32,
    max_tokens: Option<u32>,
    authenticator: Arc<DeviceCodeAuthenticator>,
    session: Mutex<Option<CachedToken>>,
    transport: Arc<dyn HttpTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl DeviceFlowExecutor {
    pub fn new(
        config: &ProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ProviderError> {
        config.validate()?;

        let device_transport =
            HttpDeviceCodeTransport::with_timeout(config.timeout, &config.user_agent)?;
        let mut authenticator = DeviceCodeAuthenticator::new(
            config.device_flow.clone(),
            config.credential_store_or_default(),
        )
        .with_transport(Arc::new(device_transport))
        .with_hooks(config.auth_hooks.clone());
        if let Some(sign_in) = &config.sign_in {
            authenticator = authenticator.with_sign_in(sign_in.clone());
        }

        Ok(Self::with_authenticator(config, Arc::new(authenticator), transport))
    }

    /// Shares an existing authenticator, e.g. one wired to a fake transport.
    pub fn with_authenticator(
        config: &ProviderConfig,
        authenticator: Arc<DeviceCodeAuthenticator>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            api_base: config
                .endpoint_trimmed()
                .unwrap_or(DEFAULT_COPILOT_API_BASE)
                .to_string(),
            session_token_url: config
                .session_token_url
                .clone()
                .unwrap_or_else(|| DEFAULT_SESSION_TOKEN_URL.to_string()),
            model: config.model.clone(),
            user_agent: config.user_agent.clone(),
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
            authenticator,
            session: Mutex::new(None),
            transport,
            hooks: config.hooks.clone(),
        }
    }

    pub fn authenticator(&self) -> &Arc<DeviceCodeAuthenticator> {
        &self.authenticator
    }

    /// Returns a live session token, exchanging the OAuth token when the
    /// cached one is missing or expired.
    async fn session_token(
        &self,
        interactive: bool,
        cancel: &CancellationToken,
    ) -> Result<SecretString, ProviderError> {
        let live = self
            .cached_session()?
            .as_ref()
            .filter(|cached| !cached.is_expired())
            .map(|cached| cached.token.clone());
        if let Some(token) = live {
            return Ok(token);
        }

        let interactive = interactive && self.authenticator.has_sign_in();
        let oauth = self.authenticator.ensure_token(interactive, cancel).await?;

        let request = HttpRequest::get(self.session_token_url.as_str())
            .with_header("Authorization", format!("token {}", oauth.expose()))
            .with_header("Accept", "application/json")
            .with_header("User-Agent", self.user_agent.as_str())
            .with_header("Editor-Version", EDITOR_VERSION);

        let response = cancellable(cancel, self.transport.send(request)).await?;
        if matches!(response.status, 401 | 403) {
            // The stored OAuth token was revoked; make the next call sign in again.
            if let Err(error) = self.authenticator.clear_token() {
                tracing::warn!(phase = "provider", event = "oauth_clear_failed", error = %error);
            }
            return Err(ProviderError::authentication(format!(
                "session token exchange rejected with HTTP {}",
                response.status
            )));
        }

        let body = response.into_success_body()?;
        let parsed: SessionTokenResponse = serde_json::from_str(&body).map_err(|err| {
            ProviderError::invalid_response(format!("session token payload: {err}"))
        })?;

        let session = CachedToken::new(parsed.token, parsed.expires_at, parsed.refresh_in);
        let token = session.token.clone();
        *self.cached_session()? = Some(session);
        Ok(token)
    }

    fn chat_request(&self, session: &SecretString, body: serde_json::Value, vision: bool) -> HttpRequest {
        HttpRequest::post(format!("{}/chat/completions", self.api_base), body)
            .with_header("Authorization", format!("Bearer {}", session.expose()))
            .with_header("Accept", "application/json")
            .with_header("User-Agent", self.user_agent.as_str())
            .with_header("Copilot-Integration-Id", INTEGRATION_ID)
            .with_header("Editor-Version", EDITOR_VERSION)
            .with_header("Copilot-Vision-Request", if vision { "true" } else { "false" })
            .with_header("X-Request-Id", Uuid::new_v4().to_string())
    }

    async fn send_chat(
        &self,
        body: serde_json::Value,
        vision: bool,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        let session = self.session_token(true, cancel).await?;
        let request = self.chat_request(&session, body, vision);
        let body = cancellable(cancel, send_for_body(self.transport.as_ref(), request)).await?;
        Ok(wire::reply_text(&body))
    }

    async fn fetch_models(&self, cancel: &CancellationToken) -> Result<Vec<String>, ProviderError> {
        let session = self.session_token(false, cancel).await?;
        let request = HttpRequest::get(format!("{}/models", self.api_base))
            .with_header("Authorization", format!("Bearer {}", session.expose()))
            .with_header("Accept", "application/json")
            .with_header("Copilot-Integration-Id", INTEGRATION_ID)
            .with_header("Editor-Version", EDITOR_VERSION);

        let body = cancellable(cancel, send_for_body(self.transport.as_ref(), request)).await?;
        let models = wire::model_ids(&body)?;
        if models.is_empty() {
            return Err(ProviderError::invalid_response("model list was empty"));
        }
        Ok(models)
    }

    fn cached_session(&self) -> Result<MutexGuard<'_, Option<CachedToken>>, ProviderError> {
        self.session
            .lock()
            .map_err(|_| ProviderError::other("session token lock poisoned"))
    }
}

impl ProviderExecutor for DeviceFlowExecutor {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeviceFlow
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
        cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(observe_operation(
            self.kind(),
            "complete",
            self.hooks.as_ref(),
            async move {
                request.validate()?;
                let body = ChatCompletionPayload {
                    model: Some(&self.model),
                    messages: &request.messages,
                    temperature: request.options.temperature.unwrap_or(self.temperature),
                    max_tokens: request.options.max_tokens.or(self.max_tokens),
                    stream: Some(false),
                }
                .to_value()?;
                self.send_chat(body, false, cancel).await
            },
        ))
    }

    fn complete_vision<'a>(
        &'a self,
        request: VisionRequest,
        cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(observe_operation(
            self.kind(),
            "complete_vision",
            self.hooks.as_ref(),
            async move {
                request.validate()?;
                let mut request = request;
                request.options = request.options.or(GenerationOptions {
                    temperature: Some(self.temperature),
                    max_tokens: self.max_tokens,
                });
                let temperature = request.options.temperature.unwrap_or(self.temperature);
                let body = wire::vision_payload(&self.model, &request, temperature);
                self.send_chat(body, true, cancel).await
            },
        ))
    }

    fn list_models<'a>(&'a self, cancel: &'a CancellationToken) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async move {
            match self.fetch_models(cancel).await {
                Ok(models) => models,
                Err(error) => {
                    tracing::warn!(
                        phase = "provider",
                        event = "model_list_fallback",
                        provider = %self.kind(),
                        error = %error
                    );
                    FALLBACK_MODELS.iter().map(|model| model.to_string()).collect()
                }
            }
        })
    }

    fn ensure_credentials<'a>(
        &'a self,
        interactive: bool,
        cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.authenticator.ensure_token(interactive, cancel).await?;
            Ok(())
        })
    }

    fn clear_credentials(&self) -> Result<bool, ProviderError> {
        *self.cached_session()? = None;
        Ok(self.authenticator.clear_token()?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sauth::{
        AuthError, CredentialStore, DeviceCodeInfo, DeviceCodeTransport, DeviceFlowConfig,
        InMemoryCredentialStore, TokenPollResponse,
    };
    use scommon::BoxFuture;

    use super::*;
    use crate::adapters::test_support::FakeTransport;
    use crate::{HttpResponse, Message, ProviderErrorKind};

    #[derive(Debug)]
    struct FixedDeviceCode;

    impl DeviceCodeTransport for FixedDeviceCode {
        fn request_device_code<'a>(
            &'a self,
            _config: &'a DeviceFlowConfig,
        ) -> BoxFuture<'a, Result<DeviceCodeInfo, AuthError>> {
            Box::pin(async {
                Ok(DeviceCodeInfo {
                    device_code: "dc".to_string(),
                    user_code: "ABCD-EFGH".to_string(),
                    verification_uri: "https://github.com/login/device".to_string(),
                    expires_in: 900,
                    interval: 5,
                })
            })
        }

        fn poll_access_token<'a>(
            &'a self,
            _config: &'a DeviceFlowConfig,
            _device_code: &'a str,
        ) -> BoxFuture<'a, Result<TokenPollResponse, AuthError>> {
            Box::pin(async { Ok(TokenPollResponse::token("gho_from_device_flow")) })
        }
    }

    fn config() -> ProviderConfig {
        ProviderConfig::new(ProviderKind::DeviceFlow, "gpt-4o")
    }

    fn executor_with_stored_token(transport: Arc<FakeTransport>) -> DeviceFlowExecutor {
        let store = Arc::new(InMemoryCredentialStore::new());
        store
            .write(
                &DeviceFlowConfig::default().credential_key,
                &SecretString::new("gho_stored_oauth"),
            )
            .expect("seed");
        let authenticator = DeviceCodeAuthenticator::new(DeviceFlowConfig::default(), store)
            .with_transport(Arc::new(FixedDeviceCode));
        DeviceFlowExecutor::with_authenticator(&config(), Arc::new(authenticator), transport)
    }

    fn session_response(expires_at: u64) -> Result<HttpResponse, ProviderError> {
        FakeTransport::ok(&format!(
            r#"{{"token":"tid=session;exp={expires_at}","expires_at":{expires_at},"refresh_in":1500}}"#
        ))
    }

    #[tokio::test]
    async fn complete_exchanges_token_and_sends_integration_headers() {
        let transport = Arc::new(FakeTransport::with_responses(vec![
            session_response(u64::MAX),
            FakeTransport::ok(r#"{"choices":[{"message":{"content":"hello"}}]}"#),
            FakeTransport::ok(r#"{"choices":[{"message":{"content":"again"}}]}"#),
        ]));
        let executor = executor_with_stored_token(transport.clone());
        let cancel = CancellationToken::new();

        let first = executor
            .complete(ModelRequest::new(vec![Message::user("hi")]), &cancel)
            .await
            .expect("first reply");
        let second = executor
            .complete(ModelRequest::new(vec![Message::user("hi")]), &cancel)
            .await
            .expect("second reply");
        assert_eq!((first.as_str(), second.as_str()), ("hello", "again"));

        let sent = transport.recorded();
        assert_eq!(sent.len(), 3, "session token is exchanged once");
        assert_eq!(sent[0].url, DEFAULT_SESSION_TOKEN_URL);
        assert_eq!(sent[0].header("authorization"), Some("token gho_stored_oauth"));

        let chat = &sent[1];
        assert_eq!(chat.url, "https://api.githubcopilot.com/chat/completions");
        assert!(chat.header("authorization").is_some_and(|v| v.starts_with("Bearer tid=session")));
        assert_eq!(chat.header("copilot-integration-id"), Some("vscode-chat"));
        assert_eq!(chat.header("copilot-vision-request"), Some("false"));
        assert!(chat.header("editor-version").is_some());
        assert_ne!(chat.header("x-request-id"), sent[2].header("x-request-id"));
    }

    #[tokio::test]
    async fn expired_session_token_is_refreshed() {
        let transport = Arc::new(FakeTransport::with_responses(vec![
            session_response(1),
            FakeTransport::ok(r#"{"choices":[{"message":{"content":"one"}}]}"#),
            session_response(u64::MAX),
            FakeTransport::ok(r#"{"choices":[{"message":{"content":"two"}}]}"#),
        ]));
        let executor = executor_with_stored_token(transport.clone());
        let cancel = CancellationToken::new();

        for _ in 0..2 {
            executor
                .complete(ModelRequest::new(vec![Message::user("hi")]), &cancel)
                .await
                .expect("reply");
        }

        let urls = transport
            .recorded()
            .into_iter()
            .map(|request| request.url)
            .filter(|url| url == DEFAULT_SESSION_TOKEN_URL)
            .count();
        assert_eq!(urls, 2);
    }

    #[tokio::test]
    async fn vision_sends_two_part_content_with_vision_header() {
        let transport = Arc::new(FakeTransport::with_responses(vec![
            session_response(u64::MAX),
            FakeTransport::ok(r#"{"choices":[{"message":{"content":"a cat"}}]}"#),
        ]));
        let executor = executor_with_stored_token(transport.clone());

        let reply = executor
            .complete_vision(
                VisionRequest::new("iVBORw0KGgo=", "image/png", "describe images", "what is this?"),
                &CancellationToken::new(),
            )
            .await
            .expect("vision reply");
        assert_eq!(reply, "a cat");

        let chat = transport.recorded().remove(1);
        assert_eq!(chat.header("copilot-vision-request"), Some("true"));
        let body = chat.body.expect("body");
        assert_eq!(body["messages"][0]["content"], "describe images");
        assert_eq!(body["messages"][1]["content"][0]["image_url"]["detail"], "high");
        assert_eq!(body["messages"][1]["content"][1]["type"], "text");
    }

    #[tokio::test]
    async fn without_sign_in_the_device_code_is_returned_as_auth_required() {
        let transport = Arc::new(FakeTransport::default());
        let authenticator = DeviceCodeAuthenticator::new(
            DeviceFlowConfig::default(),
            Arc::new(InMemoryCredentialStore::new()),
        )
        .with_transport(Arc::new(FixedDeviceCode));
        let executor =
            DeviceFlowExecutor::with_authenticator(&config(), Arc::new(authenticator), transport.clone());

        let error = executor
            .complete(
                ModelRequest::new(vec![Message::user("hi")]),
                &CancellationToken::new(),
            )
            .await
            .expect_err("needs sign-in");
        assert_eq!(error.kind, ProviderErrorKind::AuthRequired);
        assert_eq!(
            error.challenge.map(|challenge| challenge.user_code),
            Some("ABCD-EFGH".to_string())
        );
        assert!(transport.recorded().is_empty());
    }

    #[tokio::test]
    async fn rejected_exchange_clears_the_stored_oauth_token() {
        let transport = Arc::new(FakeTransport::with_responses(vec![Ok(HttpResponse::new(
            401,
            "bad credentials",
        ))]));
        let executor = executor_with_stored_token(transport);

        let error = executor
            .complete(
                ModelRequest::new(vec![Message::user("hi")]),
                &CancellationToken::new(),
            )
            .await
            .expect_err("401");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
        assert!(!executor.clear_credentials().expect("clear"));
    }

    #[tokio::test]
    async fn model_list_falls_back_to_static_list() {
        let transport = Arc::new(FakeTransport::with_responses(vec![
            session_response(u64::MAX),
            Ok(HttpResponse::new(500, "boom")),
            FakeTransport::ok(r#"{"data":[{"id":"gpt-4o"},{"id":"o1"}]}"#),
        ]));
        let executor = executor_with_stored_token(transport);
        let cancel = CancellationToken::new();

        let fallback = executor.list_models(&cancel).await;
        assert!(fallback.contains(&"gpt-4o-mini".to_string()));

        let live = executor.list_models(&cancel).await;
        assert_eq!(live, vec!["gpt-4o".to_string(), "o1".to_string()]);
    }

    #[tokio::test]
    async fn embeddings_are_unsupported() {
        let executor = executor_with_stored_token(Arc::new(FakeTransport::default()));
        let error = executor
            .embed(vec!["text".to_string()], &CancellationToken::new())
            .await
            .expect_err("unsupported");
        assert_eq!(error.kind, ProviderErrorKind::Unsupported);
    }
}
