//! Provider executors behind one completion contract.
//!
//! ```rust
//! use sprovider::{ProviderConfig, ProviderKind, build_executor};
//!
//! let config = ProviderConfig::new(ProviderKind::GatewayProxy, "llama3")
//!     .with_endpoint("http://localhost:4000");
//! let executor = build_executor(&config).expect("gateway executor");
//! assert_eq!(executor.kind(), ProviderKind::GatewayProxy);
//! ```

use std::future::Future;
use std::pin::Pin;

pub mod adapters;
mod config;
mod credentials;
mod error;
mod executor;
mod factory;
mod hooks;
mod model;
pub mod prelude;
mod transport;
mod wire;

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub use adapters::{DeviceFlowExecutor, DirectEndpointExecutor, HostedInferenceExecutor};
pub use config::{DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderConfig};
pub use credentials::{GATEWAY_PLACEHOLDER_TOKEN, MIN_TOKEN_LEN, TokenResolver, TokenSource};
pub use error::{ProviderError, ProviderErrorKind};
pub use executor::ProviderExecutor;
pub use factory::{build_executor, build_executor_with_transport};
pub use hooks::{NoopOperationHooks, ProviderOperationHooks, observe_operation};
pub use model::{Message, ModelRequest, ProviderKind, Role, VisionRequest};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
