use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use schat::{
    ChatClient, ChatConfig, ChatErrorKind, ChatEvent, ChatSession, InMemorySessionStore,
    SessionStore,
};
use scommon::SessionId;
use sprovider::{
    Message, ModelRequest, ProviderConfig, ProviderError, ProviderExecutor, ProviderFuture,
    ProviderKind, Role,
};
use stooling::{FunctionDescriptor, ToolError, required_string};
use tokio_util::sync::CancellationToken;

struct ScriptedExecutor {
    replies: Mutex<Vec<String>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedExecutor {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().rev().map(|reply| reply.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    fn last_request(&self) -> ModelRequest {
        self.requests
            .lock()
            .expect("requests lock")
            .last()
            .cloned()
            .expect("at least one request")
    }
}

impl ProviderExecutor for ScriptedExecutor {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HostedInference
    }

    fn model(&self) -> &str {
        "scripted"
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
        _cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            self.replies
                .lock()
                .expect("replies lock")
                .pop()
                .ok_or_else(|| ProviderError::other("script exhausted"))
        })
    }

    fn list_models<'a>(&'a self, _cancel: &'a CancellationToken) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async { vec!["scripted".to_string()] })
    }
}

fn chat_config() -> ChatConfig {
    ChatConfig::new(ProviderConfig::new(ProviderKind::HostedInference, "scripted"))
        .with_system_prompt("You can call functions.")
}

fn echo_function() -> FunctionDescriptor {
    FunctionDescriptor::from_sync("Echo", "Echoes the text argument", |args| {
        Ok(format!("EchoResult: {}", required_string(&args, "text")?))
    })
}

#[tokio::test]
async fn sentinel_reply_dispatches_registered_function() {
    let executor = ScriptedExecutor::new(&[r#"CALL:Echo{"text":"hi"}"#]);
    let mut chat = ChatClient::with_executor(chat_config(), executor.clone());
    chat.register_function(echo_function());
    let mut session = ChatSession::new();

    let reply = chat
        .run_with_history(&mut session, Some("say hi"), &CancellationToken::new())
        .await
        .expect("turn should succeed");

    assert_eq!(reply, "EchoResult: hi");
    let contents: Vec<_> = session.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "You can call functions.",
            "say hi",
            r#"CALL:Echo{"text":"hi"}"#,
            "EchoResult: hi",
        ]
    );
    assert_eq!(executor.request_count(), 1);
}

#[tokio::test]
async fn unknown_function_returns_the_raw_reply() {
    let executor = ScriptedExecutor::new(&[r#"CALL:Missing{"a":1}"#]);
    let mut chat = ChatClient::with_executor(chat_config(), executor);
    chat.register_function(echo_function());
    let mut session = ChatSession::new();

    let reply = chat
        .run_with_history(&mut session, Some("go"), &CancellationToken::new())
        .await
        .expect("turn should succeed");

    assert_eq!(reply, r#"CALL:Missing{"a":1}"#);
    assert_eq!(session.len(), 3);
}

#[tokio::test]
async fn failing_function_surfaces_a_tooling_error() {
    let executor = ScriptedExecutor::new(&["CALL:Echo"]);
    let mut chat = ChatClient::with_executor(chat_config(), executor);
    chat.register_function(echo_function());
    let mut session = ChatSession::new();

    let error = chat
        .run_with_history(&mut session, Some("go"), &CancellationToken::new())
        .await
        .expect_err("placeholder arguments should be rejected");

    assert_eq!(error.kind, ChatErrorKind::Tooling);
}

#[tokio::test]
async fn history_is_trimmed_before_each_request() {
    let replies = ["r1", "r2", "r3", "r4"];
    let executor = ScriptedExecutor::new(&replies);
    let chat = ChatClient::with_executor(chat_config().with_max_history_messages(3), executor.clone());
    let mut session = ChatSession::new();

    for prompt in ["p1", "p2", "p3", "p4"] {
        chat.run_with_history(&mut session, Some(prompt), &CancellationToken::new())
            .await
            .expect("turn should succeed");
    }

    let sent = executor.last_request().messages;
    assert_eq!(sent[0].role, Role::System);
    let rest: Vec<_> = sent[1..].iter().map(|m| m.content.as_str()).collect();
    assert_eq!(rest, vec!["p3", "r3", "p4"]);
}

#[tokio::test]
async fn stream_simple_yields_word_groups() {
    let reply = (0..25).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
    let executor = ScriptedExecutor::new(&[reply.as_str()]);
    let chat = ChatClient::with_executor(chat_config(), executor);

    let events: Vec<ChatEvent> = chat
        .stream_simple("sys", "count", None, &CancellationToken::new())
        .await
        .expect("stream should start")
        .map(|event| event.expect("event should be ok"))
        .collect()
        .await;

    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], ChatEvent::TextDelta(_)));
    assert_eq!(events[2], ChatEvent::Complete(String::new()));
    let joined: String = events.iter().map(ChatEvent::text).collect();
    assert_eq!(joined, reply);
}

#[tokio::test]
async fn sessions_round_trip_through_the_store() {
    let executor = ScriptedExecutor::new(&["hello back"]);
    let chat = ChatClient::with_executor(chat_config(), executor);
    let store = InMemorySessionStore::new();
    let id = SessionId::from("conversation-1");

    let mut session = store.load(&id).await.expect("load").unwrap_or_default();
    chat.run_with_history(&mut session, Some("hello"), &CancellationToken::new())
        .await
        .expect("turn should succeed");
    store.save(&id, session).await.expect("save");

    let restored = store.load(&id).await.expect("load").expect("session exists");
    assert_eq!(restored.messages().last(), Some(&Message::assistant("hello back")));
}

#[test]
fn tool_error_converts_to_tooling() {
    let error: schat::ChatError = ToolError::not_found("nope").into();
    assert_eq!(error.kind, ChatErrorKind::Tooling);
}
