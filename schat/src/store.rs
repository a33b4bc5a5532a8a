//! Session storage contracts and a basic in-memory implementation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use scommon::SessionId;

use crate::{ChatError, ChatSession};

pub type ChatFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait SessionStore: Send + Sync {
    fn load<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> ChatFuture<'a, Result<Option<ChatSession>, ChatError>>;

    fn save<'a>(
        &'a self,
        session_id: &'a SessionId,
        session: ChatSession,
    ) -> ChatFuture<'a, Result<(), ChatError>>;

    fn remove<'a>(&'a self, session_id: &'a SessionId) -> ChatFuture<'a, Result<bool, ChatError>>;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, ChatSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> ChatFuture<'a, Result<Option<ChatSession>, ChatError>> {
        Box::pin(async move {
            let sessions = self
                .sessions
                .lock()
                .map_err(|_| ChatError::store("session store lock poisoned"))?;

            Ok(sessions.get(session_id).cloned())
        })
    }

    fn save<'a>(
        &'a self,
        session_id: &'a SessionId,
        session: ChatSession,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|_| ChatError::store("session store lock poisoned"))?;

            sessions.insert(session_id.clone(), session);
            Ok(())
        })
    }

    fn remove<'a>(&'a self, session_id: &'a SessionId) -> ChatFuture<'a, Result<bool, ChatError>> {
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|_| ChatError::store("session store lock poisoned"))?;

            Ok(sessions.remove(session_id).is_some())
        })
    }
}
