//! Function registration and `CALL:` sentinel dispatch.

mod args;
mod dispatcher;
mod error;
mod function;
mod hooks;
mod registry;
mod sentinel;

pub mod prelude {
    pub use crate::{
        DispatchOutcome, FunctionDescriptor, FunctionDispatcher, FunctionHooks, FunctionRegistry,
        ToolError, ToolErrorKind,
    };
}

pub use args::{as_object, is_parse_error, optional_string, required_string};
pub use dispatcher::{DispatchOutcome, FunctionDispatcher};
pub use error::{ToolError, ToolErrorKind};
pub use function::{FunctionDescriptor, FunctionFuture};
pub use hooks::{FunctionHooks, NoopFunctionHooks};
pub use registry::FunctionRegistry;
pub use sentinel::{CALL_PREFIX, FunctionCall, parse_error_arguments, parse_function_call};
