mod device_flow;
mod direct;
mod hosted;

pub use device_flow::{DEFAULT_COPILOT_API_BASE, DEFAULT_SESSION_TOKEN_URL, DeviceFlowExecutor};
pub use direct::{DEFAULT_DIRECT_API_VERSION, DirectEndpointExecutor};
pub use hosted::{
    DEFAULT_GATEWAY_BASE_URL, DEFAULT_HOSTED_API_VERSION, DEFAULT_HOSTED_BASE_URL,
    HostedInferenceExecutor,
};

use crate::{HttpRequest, HttpTransport, ProviderError};

async fn send_for_body(
    transport: &dyn HttpTransport,
    request: HttpRequest,
) -> Result<String, ProviderError> {
    transport.send(request).await?.into_success_body()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::{HttpRequest, HttpResponse, HttpTransport, ProviderError, ProviderFuture};

    /// Replays canned responses and records every request it receives.
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        pub requests: Mutex<Vec<HttpRequest>>,
        responses: Mutex<VecDeque<Result<HttpResponse, ProviderError>>>,
    }

    impl FakeTransport {
        pub fn with_responses(responses: Vec<Result<HttpResponse, ProviderError>>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            }
        }

        pub fn ok(body: &str) -> Result<HttpResponse, ProviderError> {
            Ok(HttpResponse::new(200, body))
        }

        pub fn recorded(&self) -> Vec<HttpRequest> {
            self.requests.lock().expect("requests lock").clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn send<'a>(
            &'a self,
            request: HttpRequest,
        ) -> ProviderFuture<'a, Result<HttpResponse, ProviderError>> {
            Box::pin(async move {
                self.requests.lock().expect("requests lock").push(request);
                self.responses
                    .lock()
                    .expect("responses lock")
                    .pop_front()
                    .unwrap_or_else(|| Err(ProviderError::transport("no scripted response")))
            })
        }
    }
}
