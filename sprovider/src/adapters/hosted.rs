//! Bearer-token executor shared by the hosted-inference and gateway-proxy
//! providers. They differ only in base URL and token validation.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::credentials::TokenResolver;
use crate::executor::cancellable;
use crate::wire::{self, ChatCompletionPayload, EmbeddingPayload};
use crate::{
    HttpRequest, HttpTransport, ModelRequest, ProviderConfig, ProviderError, ProviderExecutor,
    ProviderFuture, ProviderKind, ProviderOperationHooks, observe_operation,
};

use super::send_for_body;

pub const DEFAULT_HOSTED_BASE_URL: &str = "https://models.github.ai/inference";
pub const DEFAULT_GATEWAY_BASE_URL: &str = "http://localhost:4000";
pub const DEFAULT_HOSTED_API_VERSION: &str = "2022-11-28";

const HOSTED_MODELS: &[&str] = &[
    "openai/gpt-4o",
    "openai/gpt-4o-mini",
    "openai/gpt-4.1",
    "meta/Llama-3.3-70B-Instruct",
    "microsoft/Phi-4",
];

pub struct HostedInferenceExecutor {
    kind: ProviderKind,
    base_url: String,
    model: String,
    api_version: String,
    user_agent: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tokens: TokenResolver,
    transport: Arc<dyn HttpTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl HostedInferenceExecutor {
    pub fn new(
        config: &ProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ProviderError> {
        config.validate()?;
        let default_base = match config.kind {
            ProviderKind::HostedInference => DEFAULT_HOSTED_BASE_URL,
            ProviderKind::GatewayProxy => DEFAULT_GATEWAY_BASE_URL,
            other => {
                return Err(ProviderError::configuration(format!(
                    "{other} is not served by the bearer-token executor"
                )));
            }
        };

        Ok(Self {
            kind: config.kind,
            base_url: config.endpoint_trimmed().unwrap_or(default_base).to_string(),
            model: config.model.clone(),
            api_version: config
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_HOSTED_API_VERSION.to_string()),
            user_agent: config.user_agent.clone(),
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
            tokens: TokenResolver::from_config(config),
            transport,
            hooks: config.hooks.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn authorized(&self, request: HttpRequest) -> Result<HttpRequest, ProviderError> {
        let token = self.tokens.token().await?;
        Ok(request
            .with_header("Authorization", format!("Bearer {}", token.expose()))
            .with_header("Accept", "application/json")
            .with_header("User-Agent", self.user_agent.as_str())
            .with_header("X-GitHub-Api-Version", self.api_version.as_str()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

impl ProviderExecutor for HostedInferenceExecutor {
    fn kind(&self) -> ProviderKind {
        self.kind
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
            self.kind,
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
                let http_request = self
                    .authorized(HttpRequest::post(self.endpoint("chat/completions"), body))
                    .await?;

                let body = cancellable(cancel, send_for_body(self.transport.as_ref(), http_request))
                    .await?;
                Ok(wire::reply_text(&body))
            },
        ))
    }

    fn list_models<'a>(&'a self, _cancel: &'a CancellationToken) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async move {
            let mut models = vec![self.model.clone()];
            if self.kind == ProviderKind::HostedInference {
                models.extend(
                    HOSTED_MODELS
                        .iter()
                        .filter(|model| **model != self.model)
                        .map(|model| model.to_string()),
                );
            }
            models
        })
    }

    fn embed<'a>(
        &'a self,
        inputs: Vec<String>,
        cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<Vec<Vec<f32>>, ProviderError>> {
        Box::pin(observe_operation(
            self.kind,
            "embed",
            self.hooks.as_ref(),
            async move {
                if inputs.is_empty() {
                    return Ok(Vec::new());
                }

                let body = EmbeddingPayload {
                    model: Some(&self.model),
                    input: &inputs,
                }
                .to_value()?;
                let http_request = self
                    .authorized(HttpRequest::post(self.endpoint("embeddings"), body))
                    .await?;
                let body = cancellable(cancel, send_for_body(self.transport.as_ref(), http_request))
                    .await?;
                wire::embeddings(&body, inputs.len())
            },
        ))
    }
}
