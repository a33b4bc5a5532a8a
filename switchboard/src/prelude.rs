//! Common imports for most switchboard applications.

pub use crate::{
    Assistant, ChatClient, ChatConfig, ChatError, ChatErrorKind, ChatEvent, ChatSession,
    ClearTokenResult, CompletionReply, CredentialStore, DeviceFlowConfig, EnsureTokenOutcome,
    FunctionDescriptor, Message, ProviderConfig, ProviderError, ProviderKind, Role, SessionId,
    ToolError, VectorStore,
};
pub use crate::{
    assistant_message, chat_config, parse_provider_kind, session, system_message, user_message,
};
pub use crate::{sb_config, sb_messages, sb_msg};
