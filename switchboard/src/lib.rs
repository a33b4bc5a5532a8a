//! Unified facade over the switchboard workspace crates.
//!
//! This crate is the single dependency for most applications. It re-exports
//! the workspace crates and adds message helpers, macros, and the
//! [`Assistant`] runtime that exposes the caller-facing operations.

mod macros;

pub mod prelude;
pub mod runtime;
pub mod util;

pub use sauth;
pub use schat;
pub use scommon;
pub use smemory;
pub use sobserve;
pub use sprovider;
pub use stooling;

pub use sauth::{
    AuthError, AuthErrorKind, AuthHooks, CredentialStore, DeviceCodeAuthenticator, DeviceCodeInfo,
    DeviceFlowConfig, FileCredentialStore, InMemoryCredentialStore, NoopAuthHooks, SecretString,
    SignInCallback,
};
pub use schat::{
    ChatClient, ChatConfig, ChatError, ChatErrorKind, ChatEvent, ChatEventStream, ChatSession,
    HistoryManager, InMemorySessionStore, SessionStore, TrimReport,
};
pub use scommon::{BoxFuture, GenerationOptions, MetadataMap, SessionId};
pub use smemory::{MemoryError, MemoryErrorKind, ScoredItem, SemanticIndex, VectorItem, VectorStore};
pub use sobserve::{
    MetricsObservabilityHooks, SafeAuthHooks, SafeFunctionHooks, SafeProviderHooks,
    TracingObservabilityHooks,
};
pub use sprovider::{
    Message, ModelRequest, NoopOperationHooks, ProviderConfig, ProviderError, ProviderErrorKind,
    ProviderExecutor, ProviderFuture, ProviderKind, ProviderOperationHooks, Role, VisionRequest,
    build_executor,
};
pub use stooling::{
    DispatchOutcome, FunctionDescriptor, FunctionDispatcher, FunctionHooks, FunctionRegistry,
    ToolError, ToolErrorKind, optional_string, required_string,
};

pub use runtime::{Assistant, ClearTokenResult, CompletionReply, EnsureTokenOutcome};
pub use util::{
    assistant_message, chat_config, parse_provider_kind, session, system_message, user_message,
};

#[cfg(test)]
mod tests {
    use crate::{ProviderKind, Role};

    #[test]
    fn sb_msg_macro_creates_expected_message() {
        let message = crate::sb_msg!(user => "hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "hello");
    }

    #[test]
    fn sb_messages_macro_builds_message_vector() {
        let messages = crate::sb_messages![
            system => "You are concise.",
            user => "Summarize the table",
        ];

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn sb_config_macro_supports_provider_shorthand_and_prompt() {
        let config = crate::sb_config!(direct, "gpt-4o", "You are concise and technical.");

        assert_eq!(config.provider.kind, ProviderKind::DirectEndpoint);
        assert_eq!(
            config.system_prompt.as_deref(),
            Some("You are concise and technical.")
        );
        assert_eq!(crate::sb_config!(ProviderKind::DeviceFlow, "m").provider.kind, ProviderKind::DeviceFlow);
    }
}
