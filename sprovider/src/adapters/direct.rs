//! Direct-endpoint executor for customer-hosted deployments.

use std::sync::Arc;

use sauth::SecretString;
use tokio_util::sync::CancellationToken;

use crate::executor::cancellable;
use crate::wire::{self, ChatCompletionPayload, EmbeddingPayload};
use crate::{
    HttpRequest, HttpTransport, ModelRequest, ProviderConfig, ProviderError, ProviderExecutor,
    ProviderFuture, ProviderKind, ProviderOperationHooks, observe_operation,
};

use super::send_for_body;

pub const DEFAULT_DIRECT_API_VERSION: &str = "2024-06-01";

pub struct DirectEndpointExecutor {
    endpoint: String,
    model: String,
    api_version: String,
    api_key: SecretString,
    temperature: f32,
    max_tokens: Option<u32>,
    transport: Arc<dyn HttpTransport>,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl DirectEndpointExecutor {
    pub fn new(
        config: &ProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ProviderError> {
        config.validate()?;
        let endpoint = config.endpoint_trimmed().ok_or_else(|| {
            ProviderError::configuration("direct-endpoint provider requires an endpoint URL")
        })?;
        let api_key = config
            .token
            .clone()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ProviderError::configuration("direct-endpoint provider requires an api key")
            })?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            model: config.model.clone(),
            api_version: config
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_DIRECT_API_VERSION.to_string()),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
            transport,
            hooks: config.hooks.clone(),
        })
    }

    fn deployment_url(&self, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{operation}?api-version={}",
            self.endpoint, self.model, self.api_version
        )
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request.with_header("api-key", self.api_key.expose())
    }

    pub(crate) fn build_completion(&self, request: &ModelRequest) -> Result<HttpRequest, ProviderError> {
        let body = ChatCompletionPayload {
            model: Some(&self.model),
            messages: &request.messages,
            temperature: request.options.temperature.unwrap_or(self.temperature),
            max_tokens: request.options.max_tokens.or(self.max_tokens),
            stream: None,
        }
        .to_value()?;

        Ok(self.authorized(HttpRequest::post(
            self.deployment_url("chat/completions"),
            body,
        )))
    }
}

impl ProviderExecutor for DirectEndpointExecutor {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DirectEndpoint
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
                let http_request = self.build_completion(&request)?;
                let body = cancellable(cancel, send_for_body(self.transport.as_ref(), http_request))
                    .await?;
                wire::first_choice_content(&body)
            },
        ))
    }

    fn list_models<'a>(&'a self, _cancel: &'a CancellationToken) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async move { vec![self.model.clone()] })
    }

    fn embed<'a>(
        &'a self,
        inputs: Vec<String>,
        cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<Vec<Vec<f32>>, ProviderError>> {
        Box::pin(observe_operation(
            self.kind(),
            "embed",
            self.hooks.as_ref(),
            async move {
                if inputs.is_empty() {
                    return Ok(Vec::new());
                }

                let body = EmbeddingPayload {
                    model: None,
                    input: &inputs,
                }
                .to_value()?;
                let http_request =
                    self.authorized(HttpRequest::post(self.deployment_url("embeddings"), body));
                let body = cancellable(cancel, send_for_body(self.transport.as_ref(), http_request))
                    .await?;
                wire::embeddings(&body, inputs.len())
            },
        ))
    }
}
