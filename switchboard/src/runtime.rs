//! Caller-facing operations over one [`ChatClient`] and a session store.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    ChatClient, ChatConfig, ChatError, ChatErrorKind, InMemorySessionStore, SessionId,
    SessionStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnsureTokenOutcome {
    Ready,
    AuthRequired {
        user_code: String,
        verification_uri: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReply {
    pub message: String,
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearTokenResult {
    pub success: bool,
    /// Whether a credential existed before clearing.
    pub removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct Assistant {
    chat: ChatClient,
    sessions: Arc<dyn SessionStore>,
}

impl Assistant {
    pub fn new(chat: ChatClient) -> Self {
        Self {
            chat,
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }

    pub fn from_config(config: ChatConfig) -> Result<Self, ChatError> {
        Ok(Self::new(ChatClient::create(config)?))
    }

    pub fn with_session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn chat(&self) -> &ChatClient {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatClient {
        &mut self.chat
    }

    /// Makes sure the provider holds a usable credential. A pending
    /// device-code sign-in is reported as an outcome, not an error.
    pub async fn ensure_token(
        &self,
        interactive: bool,
        cancel: &CancellationToken,
    ) -> Result<EnsureTokenOutcome, ChatError> {
        match self.chat.ensure_credentials(interactive, cancel).await {
            Ok(()) => Ok(EnsureTokenOutcome::Ready),
            Err(error) if error.kind == ChatErrorKind::AuthRequired => {
                let challenge = error
                    .provider_error
                    .as_ref()
                    .and_then(|provider| provider.challenge.as_ref());
                match challenge {
                    Some(info) => Ok(EnsureTokenOutcome::AuthRequired {
                        user_code: info.user_code.clone(),
                        verification_uri: info.verification_uri.clone(),
                    }),
                    None => Err(error),
                }
            }
            Err(error) => Err(error),
        }
    }

    /// Runs one turn in the named session, creating a new session when
    /// `session_id` is absent or unknown.
    pub async fn complete(
        &self,
        session_id: Option<SessionId>,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<CompletionReply, ChatError> {
        let session_id = session_id.unwrap_or_else(|| SessionId::new(Uuid::new_v4().to_string()));
        let mut session = self.sessions.load(&session_id).await?.unwrap_or_default();

        let message = self
            .chat
            .run_with_history(&mut session, Some(prompt), cancel)
            .await?;
        self.sessions.save(&session_id, session).await?;

        Ok(CompletionReply {
            message,
            session_id,
        })
    }

    pub async fn end_session(&self, session_id: &SessionId) -> Result<bool, ChatError> {
        self.sessions.remove(session_id).await
    }

    pub fn clear_token(&self) -> ClearTokenResult {
        match self.chat.clear_credentials() {
            Ok(removed) => ClearTokenResult {
                success: true,
                removed,
                error: None,
            },
            Err(error) => {
                tracing::warn!(phase = "auth", event = "clear_token_failed", error = %error);
                ClearTokenResult {
                    success: false,
                    removed: false,
                    error: Some(error.to_string()),
                }
            }
        }
    }
}
