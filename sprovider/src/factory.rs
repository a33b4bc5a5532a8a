//! Executor selection from a [`ProviderConfig`].

use std::sync::Arc;

use crate::{
    DeviceFlowExecutor, DirectEndpointExecutor, HostedInferenceExecutor, HttpTransport,
    ProviderConfig, ProviderError, ProviderExecutor, ProviderKind, ReqwestTransport,
};

/// Builds the executor for `config.kind` over a reqwest client honoring the
/// configured timeout and user agent.
pub fn build_executor(config: &ProviderConfig) -> Result<Arc<dyn ProviderExecutor>, ProviderError> {
    config.validate()?;
    let transport = ReqwestTransport::with_timeout(config.timeout, &config.user_agent)?;
    build_executor_with_transport(config, Arc::new(transport))
}

pub fn build_executor_with_transport(
    config: &ProviderConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Arc<dyn ProviderExecutor>, ProviderError> {
    let executor: Arc<dyn ProviderExecutor> = match config.kind {
        ProviderKind::DirectEndpoint => Arc::new(DirectEndpointExecutor::new(config, transport)?),
        ProviderKind::HostedInference | ProviderKind::GatewayProxy => {
            Arc::new(HostedInferenceExecutor::new(config, transport)?)
        }
        ProviderKind::DeviceFlow => Arc::new(DeviceFlowExecutor::new(config, transport)?),
    };

    tracing::debug!(
        phase = "provider",
        event = "executor_built",
        provider = %executor.kind(),
        model = executor.model()
    );
    Ok(executor)
}
