//! CloudFormation custom-resource wire types.
//!
//! [`LifecycleEvent`] is the request CloudFormation sends; [`ResponsePayload`]
//! is the document PUT back to the event's `ResponseURL`. Both use the
//! orchestrator's PascalCase field names.

use crate::operations::{self, OperationResult, OperationStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Lifecycle verb carried by an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
    /// Any verb CloudFormation may add later; rejected by the dispatcher.
    #[serde(untagged)]
    Other(String),
}

impl RequestType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A custom-resource request from CloudFormation.
///
/// The [`Debug`] impl drops the signature of `ResponseURL` and lists only the
/// names of the resource properties.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: RequestType,

    #[serde(rename = "ResponseURL")]
    pub response_url: String,

    #[serde(default)]
    pub stack_id: Option<String>,

    #[serde(default)]
    pub request_id: Option<String>,

    #[serde(default)]
    pub logical_resource_id: Option<String>,

    /// Present on Update and Delete; absent on Create.
    #[serde(default)]
    pub physical_resource_id: Option<String>,

    #[serde(default)]
    pub resource_type: String,

    #[serde(default)]
    pub resource_properties: Map<String, Value>,
}

impl LifecycleEvent {
    /// Parse an event from its JSON representation.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// The event's physical id, if it is present and non-empty.
    pub fn physical_resource_id(&self) -> Option<&str> {
        non_empty(self.physical_resource_id.as_deref())
    }
}

impl fmt::Debug for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let property_names: Vec<&str> =
            self.resource_properties.keys().map(String::as_str).collect();
        f.debug_struct("LifecycleEvent")
            .field("request_type", &self.request_type)
            .field("response_url", &url_without_query(&self.response_url))
            .field("stack_id", &self.stack_id)
            .field("request_id", &self.request_id)
            .field("logical_resource_id", &self.logical_resource_id)
            .field("physical_resource_id", &self.physical_resource_id)
            .field("resource_type", &self.resource_type)
            .field("resource_properties", &property_names)
            .finish()
    }
}

/// Identifiers recovered from an event that does not parse as a
/// [`LifecycleEvent`], so that its failure can still be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope {
    pub response_url: String,
    pub stack_id: Option<String>,
    pub request_id: Option<String>,
    pub logical_resource_id: Option<String>,
    pub physical_resource_id: Option<String>,
}

impl EventEnvelope {
    /// Pull the string identifiers out of a raw event.
    ///
    /// Returns `None` unless `raw` is a JSON object with a non-empty
    /// `ResponseURL` string. Fields of the wrong type are treated as absent.
    pub fn salvage(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let field = |name: &str| {
            non_empty(value.get(name).and_then(Value::as_str)).map(str::to_string)
        };

        Some(Self {
            response_url: field("ResponseURL")?,
            stack_id: field("StackId"),
            request_id: field("RequestId"),
            logical_resource_id: field("LogicalResourceId"),
            physical_resource_id: field("PhysicalResourceId"),
        })
    }

    /// `FAILED` payload for this event. The event's physical id is echoed
    /// when it has one; otherwise a placeholder is generated.
    pub fn failure_payload(&self, reason: impl Into<String>) -> ResponsePayload {
        ResponsePayload {
            stack_id: self.stack_id.clone(),
            request_id: self.request_id.clone(),
            logical_resource_id: self.logical_resource_id.clone(),
            physical_resource_id: Some(
                self.physical_resource_id
                    .clone()
                    .unwrap_or_else(operations::placeholder_id),
            ),
            status: OperationStatus::Failed,
            reason: reason.into(),
        }
    }
}

/// `url` without its query string, which for a pre-signed response URL holds
/// the signature.
pub fn url_without_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

/// Outcome document sent to the response URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponsePayload {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stack_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub logical_resource_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub physical_resource_id: Option<String>,

    pub status: OperationStatus,

    pub reason: String,
}

impl ResponsePayload {
    /// Combine the event's identifiers with an operation outcome.
    ///
    /// Identifiers that are absent or empty on the event are omitted. The
    /// result's id, when there is one, replaces the event's physical id.
    pub fn from_outcome(event: &LifecycleEvent, result: OperationResult) -> Self {
        let echoed = event.physical_resource_id().map(str::to_string);
        Self {
            stack_id: non_empty(event.stack_id.as_deref()).map(str::to_string),
            request_id: non_empty(event.request_id.as_deref()).map(str::to_string),
            logical_resource_id: non_empty(event.logical_resource_id.as_deref())
                .map(str::to_string),
            physical_resource_id: result.id.or(echoed),
            status: result.status,
            reason: result.reason,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OperationStatus::Success
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
