//! Token-budget trimming of a [`ChatSession`].
//!
//! ```rust
//! use schat::{ChatSession, HistoryManager};
//! use sprovider::Message;
//!
//! let manager = HistoryManager::new(8000, 2);
//! let mut session = ChatSession::with_system_prompt("s");
//! for turn in ["one", "two", "three"] {
//!     session.add(Message::user(turn));
//! }
//!
//! let report = manager.trim(&mut session);
//! assert_eq!(report.removed, 1);
//! assert_eq!(session.messages()[1].content, "two");
//! ```

use crate::ChatSession;

/// Messages longer than this are shortened before being dropped.
pub const TRUNCATE_THRESHOLD_CHARS: usize = 400;
pub const TRUNCATE_KEEP_CHARS: usize = 300;
pub const TRUNCATION_MARKER: &str = "\n...[truncated]";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimReport {
    pub removed: usize,
    pub truncated: usize,
    /// Where the message that was newest before trimming ended up, or
    /// `None` when it was removed.
    pub newest: Option<usize>,
}

impl TrimReport {
    pub fn changed(&self) -> bool {
        self.removed > 0 || self.truncated > 0
    }

    fn remove_at(&mut self, session: &mut ChatSession, index: usize) {
        session.remove_at(index);
        self.removed += 1;
        self.newest = match self.newest {
            Some(newest) if newest == index => None,
            Some(newest) if newest > index => Some(newest - 1),
            other => other,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryManager {
    token_budget: usize,
    max_history_messages: usize,
}

impl HistoryManager {
    pub fn new(token_budget: usize, max_history_messages: usize) -> Self {
        Self {
            token_budget,
            max_history_messages,
        }
    }

    pub fn token_budget(&self) -> usize {
        self.token_budget
    }

    pub fn max_history_messages(&self) -> usize {
        self.max_history_messages
    }

    /// Roughly four characters per token; non-empty text is at least one.
    pub fn estimate_tokens(text: &str) -> usize {
        let chars = text.chars().count();
        if chars == 0 {
            return 0;
        }
        chars.div_ceil(4).max(1)
    }

    pub fn session_tokens(session: &ChatSession) -> usize {
        session
            .messages()
            .iter()
            .map(|message| Self::estimate_tokens(&message.content))
            .sum()
    }

    /// Enforces the message-count cap, then the token budget. The system
    /// message is never touched.
    pub fn trim(&self, session: &mut ChatSession) -> TrimReport {
        let start = session.history_start();
        let mut report = TrimReport {
            newest: session.len().checked_sub(1).filter(|&last| last >= start),
            ..TrimReport::default()
        };

        while session.len() - start > self.max_history_messages {
            report.remove_at(session, start);
        }

        let mut total = Self::session_tokens(session);
        while total > self.token_budget {
            let mut changed = false;
            let mut index = start;

            while index < session.len() && total > self.token_budget {
                let content = session.messages()[index].content.clone();
                if content.chars().count() > TRUNCATE_THRESHOLD_CHARS {
                    let mut shortened: String = content.chars().take(TRUNCATE_KEEP_CHARS).collect();
                    shortened.push_str(TRUNCATION_MARKER);
                    total = total - Self::estimate_tokens(&content) + Self::estimate_tokens(&shortened);
                    session.replace_content(index, shortened);
                    report.truncated += 1;
                    index += 1;
                } else {
                    total -= Self::estimate_tokens(&content);
                    report.remove_at(session, index);
                }
                changed = true;
            }

            if !changed {
                break;
            }
        }

        if report.changed() {
            tracing::debug!(
                phase = "history",
                removed = report.removed,
                truncated = report.truncated,
                tokens = total,
                "trimmed conversation history"
            );
        }

        report
    }
}
