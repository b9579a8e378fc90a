//! CloudFormation custom resources for Okta.
//!
//! Handles custom-resource lifecycle events for three resource types and
//! applies them to an Okta organization through its REST API:
//!
//! | `ResourceType`                    | Okta object             |
//! |-----------------------------------|-------------------------|
//! | `Custom::OktaUser`                | user                    |
//! | `Custom::OktaGroup`               | group                   |
//! | `Custom::OktaUserGroupAttachment` | user membership in group|
//!
//! # Core Components
//!
//! - [`Dispatcher`] - Routes one event to its operation and reports the outcome
//! - [`IdentityApi`] - Seam for the Okta REST API, implemented by [`OktaClient`]
//! - [`CredentialProvider`] - Decrypts the API token once per process
//! - [`CallbackReporter`] - Delivers the outcome to the event's response URL
//!
//! Only `Create` and `Delete` events are supported. Every event receives a
//! callback; failures are reported as `FAILED` with a human-readable reason.

pub mod callback;
pub mod client;
pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod operations;
pub mod resource;

// Re-export commonly used types for convenience
pub use callback::{CallbackReporter, HttpCallbackReporter};
pub use client::{ApiResponse, IdentityApi, OktaClient};
pub use config::ProviderConfig;
pub use credentials::{CredentialProvider, Decrypter, KmsDecrypter, SecretToken};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, ProviderError, ProviderResult};
pub use event::{EventEnvelope, LifecycleEvent, RequestType, ResponsePayload};
pub use operations::{OperationResult, OperationStatus};
pub use resource::{ResourceKind, ResourceProperties};
