//! The chat façade: one executor, bounded history, and function dispatch.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use futures_util::StreamExt;
use scommon::GenerationOptions;
use sprovider::{
    Message, ModelRequest, ProviderExecutor, ProviderKind, VisionRequest, build_executor,
};
use stooling::{FunctionDescriptor, FunctionDispatcher, FunctionHooks};
use tokio_util::sync::CancellationToken;

use crate::streaming::{BufferedChatEventStream, reply_events};
use crate::{ChatConfig, ChatError, ChatEventStream, ChatSession, HistoryManager};

pub struct ChatClient {
    config: ChatConfig,
    executor: Arc<dyn ProviderExecutor>,
    history: HistoryManager,
    dispatcher: FunctionDispatcher,
}

impl ChatClient {
    /// Validates `config` and builds the matching provider executor.
    pub fn create(config: ChatConfig) -> Result<Self, ChatError> {
        config.validate()?;
        let executor = build_executor(&config.provider)?;
        Ok(Self::with_executor(config, executor))
    }

    pub fn with_executor(config: ChatConfig, executor: Arc<dyn ProviderExecutor>) -> Self {
        let history = HistoryManager::new(config.token_budget, config.max_history_messages);
        Self {
            config,
            executor,
            history,
            dispatcher: FunctionDispatcher::default(),
        }
    }

    pub fn with_function_hooks(mut self, hooks: Arc<dyn FunctionHooks>) -> Self {
        self.dispatcher = self.dispatcher.with_hooks(hooks);
        self
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.executor.kind()
    }

    pub fn model(&self) -> &str {
        self.executor.model()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Registers a callable function, replacing any with the same name.
    pub fn register_function(&mut self, descriptor: FunctionDescriptor) {
        let name = descriptor.name().to_string();
        if self.dispatcher.registry_mut().register(descriptor).is_some() {
            tracing::debug!(phase = "tooling", function = %name, "replaced registered function");
        }
    }

    pub fn functions(&self) -> Vec<String> {
        self.dispatcher
            .registry()
            .descriptors()
            .iter()
            .map(|descriptor| descriptor.name().to_string())
            .collect()
    }

    /// Single request with no history and no dispatch.
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: Option<f32>,
        cancel: &CancellationToken,
    ) -> Result<String, ChatError> {
        let request = ModelRequest::new(messages).with_options(options(temperature));
        Ok(self.executor.complete(request, cancel).await?)
    }

    /// Runs one conversational turn against `session`.
    ///
    /// The user message is appended and the history trimmed before the
    /// request. The assistant reply is appended afterwards. When the reply
    /// names a registered function, its output is appended as a further
    /// assistant message and returned in place of the reply.
    pub async fn run_with_history(
        &self,
        session: &mut ChatSession,
        user_prompt: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, ChatError> {
        if !session.has_system_prompt()
            && let Some(system_prompt) = &self.config.system_prompt
        {
            session.update_system_prompt(system_prompt.clone());
        }

        session.add(Message::user(user_prompt.unwrap_or_default()));
        let pending = self.history.trim(session).newest;

        let request = ModelRequest::new(session.messages().to_vec());
        let reply = match self.executor.complete(request, cancel).await {
            Ok(reply) => reply,
            Err(error) => {
                if let Some(index) = pending {
                    session.remove_at(index);
                }
                return Err(error.into());
            }
        };

        session.add(Message::assistant(reply.clone()));

        match self.dispatcher.dispatch(&reply, cancel).await? {
            Some(outcome) => {
                tracing::debug!(
                    phase = "tooling",
                    event = "function_dispatched",
                    function = %outcome.function
                );
                session.add(Message::assistant(outcome.output.clone()));
                Ok(outcome.output)
            }
            None => Ok(reply),
        }
    }

    /// Completes `user_prompt` once and returns the reply as a buffered
    /// event stream.
    pub async fn stream_simple(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: Option<f32>,
        cancel: &CancellationToken,
    ) -> Result<ChatEventStream<'static>, ChatError> {
        let messages = simple_messages(system_prompt, user_prompt);
        let reply = self.complete(messages, temperature, cancel).await?;
        let events = reply_events(self.executor.kind(), reply, self.config.simulate_streaming)
            .into_iter()
            .map(Ok)
            .collect();

        Ok(Box::pin(BufferedChatEventStream::new(events)))
    }

    /// Delivers the reply to `on_chunk` as `(text, is_final)` pairs and
    /// returns the full reply.
    pub async fn run_streaming_simple<F>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        mut on_chunk: F,
        temperature: Option<f32>,
        cancel: &CancellationToken,
    ) -> Result<String, ChatError>
    where
        F: FnMut(&str, bool) + Send,
    {
        let mut stream = self
            .stream_simple(system_prompt, user_prompt, temperature, cancel)
            .await?;

        let mut full = String::new();
        while let Some(event) = stream.next().await {
            let event = event?;
            full.push_str(event.text());
            on_chunk(event.text(), event.is_final());
        }

        Ok(full)
    }

    pub async fn vision_complete(
        &self,
        image_base64: &str,
        mime_type: &str,
        system_prompt: &str,
        user_prompt: &str,
        temperature: Option<f32>,
        cancel: &CancellationToken,
    ) -> Result<String, ChatError> {
        let mut request = VisionRequest::new(image_base64, mime_type, system_prompt, user_prompt);
        request.options = options(temperature);
        Ok(self.executor.complete_vision(request, cancel).await?)
    }

    pub async fn get_models(&self, cancel: &CancellationToken) -> Vec<String> {
        self.executor.list_models(cancel).await
    }

    pub async fn embed(
        &self,
        texts: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<f32>>, ChatError> {
        Ok(self.executor.embed(texts, cancel).await?)
    }

    pub async fn ensure_credentials(
        &self,
        interactive: bool,
        cancel: &CancellationToken,
    ) -> Result<(), ChatError> {
        Ok(self.executor.ensure_credentials(interactive, cancel).await?)
    }

    pub fn clear_credentials(&self) -> Result<bool, ChatError> {
        Ok(self.executor.clear_credentials()?)
    }

    pub fn executor(&self) -> Arc<dyn ProviderExecutor> {
        Arc::clone(&self.executor)
    }
}

impl Debug for ChatClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("provider", &self.executor.kind())
            .field("model", &self.executor.model())
            .field("history", &self.history)
            .field("functions", &self.functions())
            .finish()
    }
}

fn options(temperature: Option<f32>) -> GenerationOptions {
    GenerationOptions {
        temperature,
        ..GenerationOptions::default()
    }
}

fn simple_messages(system_prompt: &str, user_prompt: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(2);
    if !system_prompt.is_empty() {
        messages.push(Message::system(system_prompt));
    }
    messages.push(Message::user(user_prompt));
    messages
}
