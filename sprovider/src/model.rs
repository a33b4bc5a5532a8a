//! Provider-agnostic message, request, and provider-kind types.
//!
//! ```rust
//! use sprovider::{Message, ModelRequest, ProviderErrorKind, ProviderKind, Role};
//!
//! let ok = ModelRequest::new(vec![Message::new(Role::User, "What is 2+2?")]);
//! assert!(ok.validate().is_ok());
//!
//! let err = ModelRequest::new(Vec::new()).validate().expect_err("empty request");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//!
//! assert_eq!("copilot".parse::<ProviderKind>(), Ok(ProviderKind::DeviceFlow));
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use scommon::GenerationOptions;
use serde::{Deserialize, Serialize};

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Customer-hosted deployment addressed by endpoint URL and api key.
    DirectEndpoint,
    /// Hosted model catalogue behind a bearer token.
    HostedInference,
    /// OpenAI-compatible proxy; any token is accepted.
    GatewayProxy,
    /// Chat service behind an OAuth device-code sign-in.
    DeviceFlow,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        Self::DirectEndpoint,
        Self::HostedInference,
        Self::GatewayProxy,
        Self::DeviceFlow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectEndpoint => "direct-endpoint",
            Self::HostedInference => "hosted-inference",
            Self::GatewayProxy => "gateway-proxy",
            Self::DeviceFlow => "device-flow",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "direct-endpoint" | "direct" | "azure" | "azure-openai" => Ok(Self::DirectEndpoint),
            "hosted-inference" | "hosted" | "github-models" | "models" => {
                Ok(Self::HostedInference)
            }
            "gateway-proxy" | "gateway" | "proxy" | "litellm" => Ok(Self::GatewayProxy),
            "device-flow" | "device" | "copilot" | "github-copilot" => Ok(Self::DeviceFlow),
            _ => Err(ProviderError::configuration(format!(
                "unknown provider kind '{value}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
}

impl ModelRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one message is required",
            ));
        }

        validate_options(&self.options)
    }
}

/// Single-turn image question for the device-flow provider.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionRequest {
    pub image_base64: String,
    pub mime_type: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub options: GenerationOptions,
}

impl VisionRequest {
    pub fn new(
        image_base64: impl Into<String>,
        mime_type: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            image_base64: image_base64.into(),
            mime_type: mime_type.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.image_base64)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.image_base64.trim().is_empty() {
            return Err(ProviderError::invalid_request("image data must not be empty"));
        }

        if !self.mime_type.starts_with("image/") {
            return Err(ProviderError::invalid_request(format!(
                "'{}' is not an image mime type",
                self.mime_type
            )));
        }

        validate_options(&self.options)
    }
}

fn validate_options(options: &GenerationOptions) -> Result<(), ProviderError> {
    if let Some(max_tokens) = options.max_tokens
        && max_tokens == 0
    {
        return Err(ProviderError::invalid_request(
            "max_tokens must be greater than zero",
        ));
    }

    if let Some(temperature) = options.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        return Err(ProviderError::invalid_request(
            "temperature must be in the inclusive range 0.0..=2.0",
        ));
    }

    Ok(())
}
