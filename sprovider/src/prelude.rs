//! Common `sprovider` imports for downstream crates.

pub use crate::{
    Message, ModelRequest, NoopOperationHooks, ProviderConfig, ProviderError, ProviderErrorKind,
    ProviderExecutor, ProviderFuture, ProviderKind, ProviderOperationHooks, Role, VisionRequest,
    build_executor,
};
pub use scommon::{BoxFuture, GenerationOptions, MetadataMap};
