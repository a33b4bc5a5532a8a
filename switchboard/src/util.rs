//! Small convenience constructors for common types.

use crate::{ChatConfig, ChatSession, Message, ProviderConfig, ProviderKind, Role};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::new(Role::System, content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::new(Role::User, content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::new(Role::Assistant, content)
}

pub fn session(system_prompt: Option<&str>) -> ChatSession {
    match system_prompt {
        Some(prompt) => ChatSession::with_system_prompt(prompt),
        None => ChatSession::new(),
    }
}

pub fn chat_config(kind: ProviderKind, model: impl Into<String>) -> ChatConfig {
    ChatConfig::new(ProviderConfig::new(kind, model))
}

/// Parses a provider kind or one of its aliases (`azure`, `copilot`, ...).
pub fn parse_provider_kind(value: &str) -> Option<ProviderKind> {
    value.parse().ok()
}
