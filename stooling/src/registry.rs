//! Function registry with case-insensitive lookup.

use std::future::Future;
use std::sync::Arc;

use scommon::Registry;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{FunctionDescriptor, ToolError};

#[derive(Default, Clone)]
pub struct FunctionRegistry {
    functions: Registry<String, Arc<FunctionDescriptor>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `descriptor`, replacing any function whose name differs
    /// only by case. Returns the replaced descriptor.
    pub fn register(&mut self, descriptor: FunctionDescriptor) -> Option<Arc<FunctionDescriptor>> {
        self.functions
            .insert(normalize(descriptor.name()), Arc::new(descriptor))
    }

    pub fn register_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Option<Arc<FunctionDescriptor>>
    where
        F: Fn(Value, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        self.register(FunctionDescriptor::new(name, description, handler))
    }

    pub fn register_sync_fn<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Option<Arc<FunctionDescriptor>>
    where
        F: Fn(Value) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register(FunctionDescriptor::from_sync(name, description, handler))
    }

    pub fn get(&self, name: &str) -> Option<Arc<FunctionDescriptor>> {
        self.functions.get(normalize(name).as_str()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(normalize(name).as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<FunctionDescriptor>> {
        self.functions.remove(normalize(name).as_str())
    }

    /// Descriptors sorted by name, e.g. for listing in a system prompt.
    pub fn descriptors(&self) -> Vec<Arc<FunctionDescriptor>> {
        let mut descriptors = self.functions.values().cloned().collect::<Vec<_>>();
        descriptors.sort_by(|left, right| left.name().cmp(right.name()));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
