//! Simulated streaming: a complete reply re-delivered as ordered chunks.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use sprovider::ProviderKind;

use crate::ChatError;

/// Words per chunk for providers that are not chunked by line.
pub const WORDS_PER_CHUNK: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A non-final piece of the reply.
    TextDelta(String),
    /// The final piece. Empty when the reply was already delivered as deltas.
    Complete(String),
}

impl ChatEvent {
    pub fn text(&self) -> &str {
        match self {
            Self::TextDelta(text) | Self::Complete(text) => text,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

pub type ChatEventStream<'a> =
    Pin<Box<dyn Stream<Item = Result<ChatEvent, ChatError>> + Send + 'a>>;

/// Splits `reply` into chunks whose concatenation is exactly `reply`.
/// Direct endpoints are chunked by line, everything else by word groups.
pub fn chunk_reply(kind: ProviderKind, reply: &str) -> Vec<String> {
    if reply.is_empty() {
        return Vec::new();
    }

    match kind {
        ProviderKind::DirectEndpoint => reply.split_inclusive('\n').map(str::to_string).collect(),
        _ => {
            let words: Vec<&str> = reply.split(' ').collect();
            let groups = words.len().div_ceil(WORDS_PER_CHUNK);
            words
                .chunks(WORDS_PER_CHUNK)
                .enumerate()
                .map(|(index, group)| {
                    let mut chunk = group.join(" ");
                    if index + 1 < groups {
                        chunk.push(' ');
                    }
                    chunk
                })
                .collect()
        }
    }
}

/// The event sequence for one reply.
pub fn reply_events(kind: ProviderKind, reply: String, simulate: bool) -> Vec<ChatEvent> {
    if !simulate {
        return vec![ChatEvent::Complete(reply)];
    }

    let mut events: Vec<ChatEvent> = chunk_reply(kind, &reply)
        .into_iter()
        .map(ChatEvent::TextDelta)
        .collect();
    events.push(ChatEvent::Complete(String::new()));
    events
}

pub(crate) struct BufferedChatEventStream {
    events: VecDeque<Result<ChatEvent, ChatError>>,
}

impl BufferedChatEventStream {
    pub(crate) fn new(events: Vec<Result<ChatEvent, ChatError>>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl Stream for BufferedChatEventStream {
    type Item = Result<ChatEvent, ChatError>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.events.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_endpoint_chunks_by_line() {
        let chunks = chunk_reply(ProviderKind::DirectEndpoint, "one\ntwo\nthree");
        assert_eq!(chunks, vec!["one\n", "two\n", "three"]);
    }

    #[test]
    fn other_providers_chunk_by_twenty_words() {
        let reply = (0..45).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_reply(ProviderKind::HostedInference, &reply);

        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].ends_with(' '));
        assert_eq!(chunks[2], "w40 w41 w42 w43 w44");
        assert_eq!(chunks.concat(), reply);
    }

    #[test]
    fn simulated_events_end_with_an_empty_final_chunk() {
        let events = reply_events(ProviderKind::GatewayProxy, "short reply".to_string(), true);
        assert_eq!(
            events,
            vec![
                ChatEvent::TextDelta("short reply".to_string()),
                ChatEvent::Complete(String::new()),
            ]
        );
    }

    #[test]
    fn without_simulation_the_whole_reply_is_final() {
        let events = reply_events(ProviderKind::DeviceFlow, "a b c".to_string(), false);
        assert_eq!(events, vec![ChatEvent::Complete("a b c".to_string())]);
    }

    #[test]
    fn empty_reply_yields_only_the_final_marker() {
        let events = reply_events(ProviderKind::HostedInference, String::new(), true);
        assert_eq!(events, vec![ChatEvent::Complete(String::new())]);
    }
}
