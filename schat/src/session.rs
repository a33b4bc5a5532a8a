//! Ordered conversation state with a single leading system message.
//!
//! ```rust
//! use schat::ChatSession;
//! use sprovider::{Message, Role};
//!
//! let mut session = ChatSession::with_system_prompt("Be brief.");
//! session.add(Message::user("hi"));
//! session.update_system_prompt("Be thorough.");
//!
//! assert_eq!(session.len(), 2);
//! assert_eq!(session.messages()[0].role, Role::System);
//! assert_eq!(session.system_prompt(), Some("Be thorough."));
//! ```

use serde::{Deserialize, Serialize};
use sprovider::{Message, Role};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionSnapshot", into = "SessionSnapshot")]
pub struct ChatSession {
    messages: Vec<Message>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.update_system_prompt(prompt);
        session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_system_prompt(&self) -> bool {
        self.messages
            .first()
            .is_some_and(|message| message.role == Role::System)
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|message| message.role == Role::System)
            .map(|message| message.content.as_str())
    }

    /// Index of the first message trimming may touch.
    pub fn history_start(&self) -> usize {
        usize::from(self.has_system_prompt())
    }

    /// Appends `message`. A system message replaces the leading system
    /// prompt instead of being appended.
    pub fn add(&mut self, message: Message) {
        if message.role == Role::System {
            self.update_system_prompt(message.content);
            return;
        }

        self.messages.push(message);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Message> {
        (index < self.messages.len()).then(|| self.messages.remove(index))
    }

    pub fn update_system_prompt(&mut self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        match self.messages.first_mut() {
            Some(first) if first.role == Role::System => first.content = prompt,
            _ => self.messages.insert(0, Message::system(prompt)),
        }
    }

    /// Drops every non-system message.
    pub fn clear_history(&mut self) {
        let start = self.history_start();
        self.messages.truncate(start);
    }

    pub(crate) fn replace_content(&mut self, index: usize, content: String) {
        if let Some(message) = self.messages.get_mut(index) {
            message.content = content;
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SessionSnapshot {
    messages: Vec<Message>,
}

impl TryFrom<SessionSnapshot> for ChatSession {
    type Error = String;

    fn try_from(snapshot: SessionSnapshot) -> Result<Self, Self::Error> {
        let misplaced = snapshot
            .messages
            .iter()
            .enumerate()
            .any(|(index, message)| index > 0 && message.role == Role::System);
        if misplaced {
            return Err("system message may only appear first".to_string());
        }

        Ok(Self {
            messages: snapshot.messages,
        })
    }
}

impl From<ChatSession> for SessionSnapshot {
    fn from(session: ChatSession) -> Self {
        Self {
            messages: session.messages,
        }
    }
}
