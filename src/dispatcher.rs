//! Lifecycle event dispatch.
//!
//! [`Dispatcher`] is the entry point for one CloudFormation event: it
//! classifies the resource, filters its properties, runs the matching
//! operation, and reports the outcome to the event's response URL.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tropokta::{
//!     CredentialProvider, Dispatcher, HttpCallbackReporter, KmsDecrypter, LifecycleEvent,
//!     OktaClient, ProviderConfig,
//! };
//!
//! # async fn example(raw_event: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::from_env()?;
//! let decrypter = KmsDecrypter::from_env().await;
//! let credentials = Arc::new(CredentialProvider::new(config.encrypted_token.clone(), decrypter));
//! let client = OktaClient::new(&config, credentials)?;
//! let reporter = HttpCallbackReporter::new(config.request_timeout)?;
//! let dispatcher = Dispatcher::new(client, reporter);
//!
//! let event = LifecycleEvent::from_json(raw_event)?;
//! let payload = dispatcher.handle(&event).await?;
//! println!("{:?}", payload.status);
//! # Ok(())
//! # }
//! ```

use crate::callback::CallbackReporter;
use crate::client::IdentityApi;
use crate::error::{ProviderError, ProviderResult};
use crate::event::{EventEnvelope, LifecycleEvent, RequestType, ResponsePayload};
use crate::operations::{self, OperationResult};
use crate::resource::{ResourceKind, ResourceProperties};
use log::{debug, info, warn};

/// Routes lifecycle events to resource operations and reports the outcome.
pub struct Dispatcher<A, R> {
    api: A,
    reporter: R,
}

impl<A, R> Dispatcher<A, R>
where
    A: IdentityApi + Sync,
    R: CallbackReporter + Sync,
{
    pub fn new(api: A, reporter: R) -> Self {
        Self { api, reporter }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Handle one event end to end: dispatch, then report to `ResponseURL`.
    ///
    /// A callback is attempted for every event. Errors that cannot be folded
    /// into a `FAILED` outcome (such as credential failures) are still
    /// reported, then returned so the caller can stop serving.
    pub async fn handle(&self, event: &LifecycleEvent) -> ProviderResult<ResponsePayload> {
        let (payload, fatal) = match self.dispatch(event).await {
            Ok(payload) => (payload, None),
            Err(e) => (failure_payload(event, &e), Some(e)),
        };

        self.reporter.report(&event.response_url, &payload).await?;

        match fatal {
            Some(e) => Err(e),
            None => Ok(payload),
        }
    }

    /// Handle an event in its raw JSON form.
    ///
    /// An event that does not parse is still answered with a `FAILED`
    /// callback when its `ResponseURL` can be recovered. `Ok(None)` means
    /// there was nowhere to report to and the event was dropped.
    pub async fn handle_raw(&self, raw: &str) -> ProviderResult<Option<ResponsePayload>> {
        let parse_error = match LifecycleEvent::from_json(raw) {
            Ok(event) => return self.handle(&event).await.map(Some),
            Err(e) => e,
        };

        let Some(envelope) = EventEnvelope::salvage(raw) else {
            warn!("Dropping malformed event with no response URL: {}", parse_error);
            return Ok(None);
        };

        warn!("Reporting malformed event as failed: {}", parse_error);
        let payload = envelope.failure_payload(format!("Malformed event: {parse_error}"));
        self.reporter.report(&envelope.response_url, &payload).await?;
        Ok(Some(payload))
    }

    /// Build the response payload for an event without reporting it.
    ///
    /// Dispatch and transport failures become a `FAILED` payload; only
    /// non-reportable errors are returned.
    pub async fn dispatch(&self, event: &LifecycleEvent) -> ProviderResult<ResponsePayload> {
        info!(
            "Received {} event for {} (logical id: {})",
            event.request_type,
            event.resource_type,
            event.logical_resource_id.as_deref().unwrap_or("-")
        );
        debug!("Event: {:?}", event);

        match self.run(event).await {
            Ok(result) => {
                if result.is_success() {
                    info!("{} {} succeeded", event.request_type, event.resource_type);
                } else {
                    warn!(
                        "{} {} failed: {}",
                        event.request_type, event.resource_type, result.reason
                    );
                }
                Ok(ResponsePayload::from_outcome(event, result))
            }
            Err(e) if e.is_reportable() => {
                warn!("{} {} failed: {}", event.request_type, event.resource_type, e);
                Ok(failure_payload(event, &e))
            }
            Err(e) => Err(e),
        }
    }

    async fn run(&self, event: &LifecycleEvent) -> ProviderResult<OperationResult> {
        let kind = ResourceKind::from_resource_type(&event.resource_type)?;
        let properties = ResourceProperties::filter(
            kind,
            &event.resource_properties,
            event.physical_resource_id(),
        );
        debug!(
            "Filtered {} properties (physical id: {:?})",
            kind, properties.physical_resource_id
        );

        operations::execute(&self.api, &event.request_type, &properties).await
    }
}

/// `FAILED` payload for an error raised before or instead of an operation
/// result. Creates get a placeholder id; other verbs echo the event's id.
fn failure_payload(event: &LifecycleEvent, error: &ProviderError) -> ResponsePayload {
    let result = match event.request_type {
        RequestType::Create => OperationResult::failed_with_placeholder(error.to_string()),
        _ => OperationResult::failed(error.to_string(), None::<String>),
    };
    ResponsePayload::from_outcome(event, result)
}
