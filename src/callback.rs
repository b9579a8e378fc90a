//! Delivery of outcomes to the orchestrator.
//!
//! CloudFormation hands every event a pre-signed response URL and waits for a
//! single PUT of the outcome document. Delivery is attempted once; if it
//! fails, the stack operation times out on the orchestrator side.

use crate::error::{ProviderError, ProviderResult};
use crate::event::{ResponsePayload, url_without_query};
use log::{debug, error, info};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Sends a [`ResponsePayload`] to an event's response URL.
pub trait CallbackReporter {
    fn report(
        &self,
        response_url: &str,
        payload: &ResponsePayload,
    ) -> impl Future<Output = ProviderResult<()>> + Send;
}

/// reqwest-based [`CallbackReporter`].
#[derive(Debug, Clone)]
pub struct HttpCallbackReporter {
    http_client: Client,
}

impl HttpCallbackReporter {
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(http_client))
    }

    pub fn with_http_client(http_client: Client) -> Self {
        Self { http_client }
    }

    async fn put(&self, response_url: &str, body: String) -> ProviderResult<()> {
        // Errors carry the URL without its signature.
        let target = url_without_query(response_url);

        // The pre-signed URL is signed without a content type, so none is sent.
        let response = self
            .http_client
            .put(response_url)
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::callback(target, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::callback(
                target,
                format!("status {}: {}", status.as_u16(), text),
            ));
        }
        Ok(())
    }
}

impl CallbackReporter for HttpCallbackReporter {
    fn report(
        &self,
        response_url: &str,
        payload: &ResponsePayload,
    ) -> impl Future<Output = ProviderResult<()>> + Send {
        let body = serde_json::to_string(payload);
        let status = payload.status;
        async move {
            let body = body?;
            debug!("Callback payload: {}", body);

            match self.put(response_url, body).await {
                Ok(()) => {
                    info!("Reported {:?} to response URL", status);
                    Ok(())
                }
                Err(e) => {
                    error!("{}", e);
                    Err(e)
                }
            }
        }
    }
}
