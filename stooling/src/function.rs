//! Registered function descriptors and their async handlers.
//!
//! ```rust
//! use stooling::FunctionDescriptor;
//!
//! let echo = FunctionDescriptor::from_sync("Echo", "Echoes the text argument", |args| {
//!     Ok(format!("EchoResult: {}", args["text"].as_str().unwrap_or_default()))
//! });
//!
//! assert_eq!(echo.name(), "Echo");
//! ```

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use scommon::BoxFuture;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::ToolError;

pub type FunctionFuture = BoxFuture<'static, Result<String, ToolError>>;

type FunctionHandler = dyn Fn(Value, CancellationToken) -> FunctionFuture + Send + Sync;

#[derive(Clone)]
pub struct FunctionDescriptor {
    name: String,
    description: String,
    handler: Arc<FunctionHandler>,
}

impl FunctionDescriptor {
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        let handler: Arc<FunctionHandler> =
            Arc::new(move |arguments, cancel| Box::pin(handler(arguments, cancel)));

        Self {
            name: name.into(),
            description: description.into(),
            handler,
        }
    }

    pub fn from_sync<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        Self::new(name, description, move |arguments, _cancel| {
            let output = handler(arguments);
            async move { output }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn invoke(&self, arguments: Value, cancel: CancellationToken) -> FunctionFuture {
        (self.handler)(arguments, cancel)
    }
}

impl Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
