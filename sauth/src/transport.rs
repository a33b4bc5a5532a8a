//! HTTP seam for the two device-flow endpoints.

use std::fmt::Debug;
use std::time::Duration;

use reqwest::header::ACCEPT;
use scommon::BoxFuture;

use crate::device_code::DEVICE_CODE_GRANT_TYPE;
use crate::{AuthError, DeviceCodeInfo, DeviceFlowConfig, TokenPollResponse};

pub trait DeviceCodeTransport: Send + Sync + Debug {
    fn request_device_code<'a>(
        &'a self,
        config: &'a DeviceFlowConfig,
    ) -> BoxFuture<'a, Result<DeviceCodeInfo, AuthError>>;

    fn poll_access_token<'a>(
        &'a self,
        config: &'a DeviceFlowConfig,
        device_code: &'a str,
    ) -> BoxFuture<'a, Result<TokenPollResponse, AuthError>>;
}

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpDeviceCodeTransport {
    client: reqwest::Client,
}

impl Default for HttpDeviceCodeTransport {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::new(client)
    }
}

impl HttpDeviceCodeTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration, user_agent: &str) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|error| AuthError::transport(format!("http client: {error}")))?;
        Ok(Self::new(client))
    }

    async fn post_form<T>(&self, url: &str, form: &[(&str, &str)]) -> Result<T, AuthError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(|error| AuthError::transport(format!("request to {url} failed: {error}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| AuthError::transport(format!("failed to read body: {error}")))?;

        // The token endpoint reports pending/denied states as JSON on 4xx too.
        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(AuthError::transport(format!(
                "{url} returned {status}: {body}"
            ))),
            Err(error) => Err(AuthError::invalid_response(format!(
                "unexpected payload from {url}: {error}"
            ))),
        }
    }
}

impl DeviceCodeTransport for HttpDeviceCodeTransport {
    fn request_device_code<'a>(
        &'a self,
        config: &'a DeviceFlowConfig,
    ) -> BoxFuture<'a, Result<DeviceCodeInfo, AuthError>> {
        Box::pin(async move {
            let url = config.device_code_url();
            self.post_form(
                &url,
                &[
                    ("client_id", config.client_id.as_str()),
                    ("scope", config.scope.as_str()),
                ],
            )
            .await
        })
    }

    fn poll_access_token<'a>(
        &'a self,
        config: &'a DeviceFlowConfig,
        device_code: &'a str,
    ) -> BoxFuture<'a, Result<TokenPollResponse, AuthError>> {
        Box::pin(async move {
            let url = config.access_token_url();
            self.post_form(
                &url,
                &[
                    ("client_id", config.client_id.as_str()),
                    ("device_code", device_code),
                    ("grant_type", DEVICE_CODE_GRANT_TYPE),
                ],
            )
            .await
        })
    }
}
