//! Dispatches a model reply to a registered function when it carries the
//! call sentinel.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::{FunctionHooks, FunctionRegistry, NoopFunctionHooks, ToolError, parse_function_call};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub function: String,
    pub output: String,
}

#[derive(Clone)]
pub struct FunctionDispatcher {
    registry: FunctionRegistry,
    hooks: Arc<dyn FunctionHooks>,
}

impl Default for FunctionDispatcher {
    fn default() -> Self {
        Self::new(FunctionRegistry::new())
    }
}

impl FunctionDispatcher {
    pub fn new(registry: FunctionRegistry) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopFunctionHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn FunctionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Runs at most one function for `reply`. Returns `Ok(None)` when the
    /// reply is not a call or names an unregistered function.
    pub async fn dispatch(
        &self,
        reply: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<DispatchOutcome>, ToolError> {
        if self.registry.is_empty() {
            return Ok(None);
        }

        let Some(call) = parse_function_call(reply) else {
            return Ok(None);
        };

        let Some(function) = self.registry.get(&call.name) else {
            tracing::debug!(
                phase = "tooling",
                event = "unknown_function",
                function = %call.name
            );
            return Ok(None);
        };

        let name = function.name().to_string();
        self.hooks.on_dispatch_start(&name);
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ToolError::cancelled("function dispatch was cancelled")),
            result = function.invoke(call.arguments, cancel.clone()) => result,
        }
        .map_err(|error| error.with_function_name(name.as_str()));

        match result {
            Ok(output) => {
                self.hooks.on_dispatch_success(&name, started.elapsed());
                Ok(Some(DispatchOutcome {
                    function: name,
                    output,
                }))
            }
            Err(error) => {
                self.hooks
                    .on_dispatch_failure(&name, &error, started.elapsed());
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::{ToolErrorKind, required_string};

    fn echo_registry() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        registry.register_sync_fn("Echo", "Echoes text", |args| {
            Ok(format!("EchoResult: {}", required_string(&args, "text")?))
        });
        registry
    }

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl FunctionHooks for RecordingHooks {
        fn on_dispatch_start(&self, function: &str) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{function}"));
        }

        fn on_dispatch_success(&self, function: &str, _elapsed: Duration) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("success:{function}"));
        }

        fn on_dispatch_failure(&self, function: &str, error: &ToolError, _elapsed: Duration) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("failure:{function}:{:?}", error.kind));
        }
    }

    #[tokio::test]
    async fn echo_sentinel_dispatches_to_handler() {
        let hooks = Arc::new(RecordingHooks::default());
        let dispatcher = FunctionDispatcher::new(echo_registry()).with_hooks(hooks.clone());

        let outcome = dispatcher
            .dispatch(r#"CALL:echo{"text":"hi"}"#, &CancellationToken::new())
            .await
            .expect("dispatch")
            .expect("matched");

        assert_eq!(outcome.function, "Echo");
        assert_eq!(outcome.output, "EchoResult: hi");
        assert_eq!(
            *hooks.events.lock().expect("events lock"),
            vec!["start:Echo", "success:Echo"]
        );
    }

    #[tokio::test]
    async fn unknown_names_and_plain_replies_are_not_dispatched() {
        let dispatcher = FunctionDispatcher::new(echo_registry());
        let cancel = CancellationToken::new();

        assert_eq!(
            dispatcher.dispatch("CALL:Missing{}", &cancel).await,
            Ok(None)
        );
        assert_eq!(dispatcher.dispatch("just text", &cancel).await, Ok(None));
        assert_eq!(
            FunctionDispatcher::default()
                .dispatch(r#"CALL:Echo{"text":"hi"}"#, &cancel)
                .await,
            Ok(None)
        );
    }

    #[tokio::test]
    async fn handler_errors_carry_the_function_name() {
        let dispatcher = FunctionDispatcher::new(echo_registry());

        let error = dispatcher
            .dispatch("CALL:Echo{broken", &CancellationToken::new())
            .await
            .expect_err("parse_error placeholder has no text field");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
        assert_eq!(error.function_name.as_deref(), Some("Echo"));
    }

    #[tokio::test]
    async fn cancelled_dispatch_does_not_run_handler() {
        let mut registry = FunctionRegistry::new();
        registry.register_fn("Slow", "never finishes", |_args, _cancel| {
            std::future::pending::<Result<String, ToolError>>()
        });
        let dispatcher = FunctionDispatcher::new(registry);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = dispatcher
            .dispatch("CALL:Slow{}", &cancel)
            .await
            .expect_err("cancelled");
        assert_eq!(error.kind, ToolErrorKind::Cancelled);
    }
}
