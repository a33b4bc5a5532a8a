//! Conversational layer over `sprovider` executors.
//!
//! ```rust
//! use schat::{ChatConfig, ChatSession, HistoryManager};
//! use sprovider::{Message, ProviderConfig, ProviderKind};
//!
//! let config = ChatConfig::new(ProviderConfig::new(ProviderKind::GatewayProxy, "llama3"))
//!     .with_system_prompt("Answer in one line.")
//!     .with_max_history_messages(4);
//!
//! let manager = HistoryManager::new(config.token_budget, config.max_history_messages);
//! let mut session = ChatSession::with_system_prompt("Answer in one line.");
//! session.add(Message::user("hello"));
//! assert!(!manager.trim(&mut session).changed());
//! ```

mod client;
mod config;
mod error;
mod history;
mod session;
mod store;
mod streaming;

pub mod prelude {
    pub use crate::{
        ChatClient, ChatConfig, ChatError, ChatErrorKind, ChatEvent, ChatEventStream, ChatSession,
        HistoryManager, InMemorySessionStore, SessionStore,
    };
}

pub use client::ChatClient;
pub use config::{ChatConfig, DEFAULT_MAX_HISTORY_MESSAGES, DEFAULT_TOKEN_BUDGET};
pub use error::{ChatError, ChatErrorKind};
pub use history::{
    HistoryManager, TRUNCATE_KEEP_CHARS, TRUNCATE_THRESHOLD_CHARS, TRUNCATION_MARKER, TrimReport,
};
pub use session::ChatSession;
pub use store::{ChatFuture, InMemorySessionStore, SessionStore};
pub use streaming::{ChatEvent, ChatEventStream, WORDS_PER_CHUNK, chunk_reply, reply_events};
