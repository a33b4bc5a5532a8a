//! Conversational settings layered over a provider configuration.

use sprovider::ProviderConfig;

use crate::ChatError;

pub const DEFAULT_TOKEN_BUDGET: usize = 8000;
pub const DEFAULT_MAX_HISTORY_MESSAGES: usize = 20;

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub provider: ProviderConfig,
    pub system_prompt: Option<String>,
    pub token_budget: usize,
    pub max_history_messages: usize,
    /// Re-chunk complete replies in the streaming API.
    pub simulate_streaming: bool,
}

impl ChatConfig {
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            system_prompt: None,
            token_budget: DEFAULT_TOKEN_BUDGET,
            max_history_messages: DEFAULT_MAX_HISTORY_MESSAGES,
            simulate_streaming: true,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_token_budget(mut self, token_budget: usize) -> Self {
        self.token_budget = token_budget;
        self
    }

    pub fn with_max_history_messages(mut self, max_history_messages: usize) -> Self {
        self.max_history_messages = max_history_messages;
        self
    }

    pub fn with_simulated_streaming(mut self, enabled: bool) -> Self {
        self.simulate_streaming = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        self.provider.validate()?;

        if self.token_budget == 0 {
            return Err(ChatError::configuration("token_budget must be greater than zero"));
        }

        Ok(())
    }
}
