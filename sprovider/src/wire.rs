//! Chat-completion payload serde models and response extraction helpers.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{Message, ProviderError, VisionRequest};

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub messages: &'a [Message],
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionPayload<'_> {
    pub fn to_value(&self) -> Result<Value, ProviderError> {
        serde_json::to_value(self)
            .map_err(|err| ProviderError::invalid_request(format!("payload encoding: {err}")))
    }
}

pub(crate) fn vision_payload(model: &str, request: &VisionRequest, temperature: f32) -> Value {
    let mut payload = json!({
        "model": model,
        "messages": [
            { "role": "system", "content": request.system_prompt },
            {
                "role": "user",
                "content": [
                    {
                        "type": "image_url",
                        "image_url": { "url": request.data_url(), "detail": "high" }
                    },
                    { "type": "text", "text": request.user_prompt }
                ]
            }
        ],
        "temperature": temperature,
        "stream": false,
    });

    if let Some(max_tokens) = request.options.max_tokens {
        payload["max_tokens"] = json!(max_tokens);
    }

    payload
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub output_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}

/// Strict extraction: the first choice's message content must be present.
pub(crate) fn first_choice_content(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|err| ProviderError::invalid_response(format!("completion payload: {err}")))?;

    parsed.first_content().ok_or_else(|| {
        ProviderError::invalid_response("completion payload contained no message content")
    })
}

/// Lenient extraction: `choices[0].message.content`, then `output_text`,
/// then the raw body.
pub(crate) fn reply_text(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ChatCompletionResponse>(body) else {
        return body.to_string();
    };

    let output_text = parsed.output_text.clone();
    parsed
        .first_content()
        .or(output_text)
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub input: &'a [String],
}

impl EmbeddingPayload<'_> {
    pub fn to_value(&self) -> Result<Value, ProviderError> {
        serde_json::to_value(self)
            .map_err(|err| ProviderError::invalid_request(format!("payload encoding: {err}")))
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Vectors ordered by their `index` so they line up with the inputs.
pub(crate) fn embeddings(body: &str, expected: usize) -> Result<Vec<Vec<f32>>, ProviderError> {
    let mut parsed: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|err| ProviderError::invalid_response(format!("embedding payload: {err}")))?;

    if parsed.data.len() != expected {
        return Err(ProviderError::invalid_response(format!(
            "expected {expected} embeddings, received {}",
            parsed.data.len()
        )));
    }

    parsed.data.sort_by_key(|datum| datum.index);
    Ok(parsed
        .data
        .into_iter()
        .map(|datum| datum.embedding)
        .collect())
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    data: Vec<ModelListEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelListEntry {
    id: String,
}

pub(crate) fn model_ids(body: &str) -> Result<Vec<String>, ProviderError> {
    let parsed: ModelListResponse = serde_json::from_str(body)
        .map_err(|err| ProviderError::invalid_response(format!("model list payload: {err}")))?;

    Ok(parsed.data.into_iter().map(|entry| entry.id).collect())
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionTokenResponse {
    pub token: String,
    pub expires_at: u64,
    #[serde(default)]
    pub refresh_in: u64,
}
