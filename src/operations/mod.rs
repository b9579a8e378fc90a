//! Resource operations against the Okta API.
//!
//! Each (resource kind, verb) pair maps to one function that turns typed
//! properties into an [`OperationResult`]. Non-success statuses from Okta are
//! not errors here: they become a `FAILED` result carrying the response body.
//! Errors are reserved for routing problems ([`DispatchError`]) and transport
//! failures, which the dispatcher reports on the operation's behalf.

pub mod group;
pub mod membership;
pub mod user;


use crate::client::{ApiResponse, IdentityApi};
use crate::error::{DispatchError, ProviderResult};
use crate::event::RequestType;
use crate::resource::{KindProperties, ResourceKind, ResourceProperties};
use log::warn;
use serde::{Deserialize, Serialize};

/// Reason reported for every successful operation.
pub const DEFAULT_REASON: &str = "DEFAULT";

/// Outcome status understood by CloudFormation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Success,
    Failed,
}

/// Normalized outcome of one resource operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub status: OperationStatus,
    /// `DEFAULT` on success, otherwise a human-readable failure reason.
    pub reason: String,
    /// Physical id to report, if the operation produced or kept one.
    pub id: Option<String>,
}

impl OperationResult {
    pub fn success(id: Option<impl Into<String>>) -> Self {
        Self {
            status: OperationStatus::Success,
            reason: DEFAULT_REASON.to_string(),
            id: id.map(Into::into),
        }
    }

    pub fn failed(reason: impl Into<String>, id: Option<impl Into<String>>) -> Self {
        Self {
            status: OperationStatus::Failed,
            reason: reason.into(),
            id: id.map(Into::into),
        }
    }

    /// A failure carrying a freshly generated placeholder id, so the
    /// orchestrator still has something to track.
    pub fn failed_with_placeholder(reason: impl Into<String>) -> Self {
        Self::failed(reason, Some(placeholder_id()))
    }

    pub fn is_success(&self) -> bool {
        self.status == OperationStatus::Success
    }
}

/// Generate a placeholder physical id.
pub fn placeholder_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Encode `id` as exactly one URL path segment.
///
/// Percent-encoding keeps `/`, `?` and `#` inside the segment. `.` and `..`
/// are still dot segments after encoding, so they are rejected along with
/// the empty string.
pub(crate) fn path_segment(
    kind: ResourceKind,
    name: &str,
    id: &str,
) -> Result<String, DispatchError> {
    if matches!(id, "" | "." | "..") {
        return Err(DispatchError::invalid_identifier(kind.as_str(), name, id));
    }
    Ok(urlencoding::encode(id).into_owned())
}

/// Run the operation registered for `request_type` on these properties.
///
/// Only `Create` and `Delete` are registered; any other verb is rejected with
/// [`DispatchError::UnsupportedRequestType`].
pub async fn execute<A: IdentityApi + Sync>(
    api: &A,
    request_type: &RequestType,
    properties: &ResourceProperties,
) -> ProviderResult<OperationResult> {
    match (request_type, &properties.attributes) {
        (RequestType::Create, KindProperties::User(user)) => user::create_user(api, user).await,
        (RequestType::Delete, KindProperties::User(_)) => {
            user::delete_user(api, properties.require_physical_id()?).await
        }
        (RequestType::Create, KindProperties::Group(group)) => {
            group::create_group(api, group).await
        }
        (RequestType::Delete, KindProperties::Group(_)) => {
            group::delete_group(api, properties.require_physical_id()?).await
        }
        (RequestType::Create, KindProperties::Membership(membership)) => {
            let (group_id, user_id) = membership.ids()?;
            membership::create_membership(api, group_id, user_id).await
        }
        (RequestType::Delete, KindProperties::Membership(membership)) => {
            let (group_id, user_id) = membership.ids()?;
            membership::delete_membership(api, group_id, user_id).await
        }
        (other, attributes) => Err(DispatchError::UnsupportedRequestType {
            resource_type: attributes.kind().to_string(),
            request_type: other.to_string(),
        }
        .into()),
    }
}

/// Interpret a create response: the expected status with an `id` in the body
/// is a success, anything else fails with a placeholder id.
pub(crate) fn created(response: ApiResponse, expected_status: u16, what: &str) -> OperationResult {
    if response.status != expected_status {
        warn!("Okta rejected {} creation with status {}", what, response.status);
        return OperationResult::failed_with_placeholder(response.body);
    }

    match response.id() {
        Some(id) => OperationResult::success(Some(id)),
        None => {
            warn!("Okta {} creation response did not include an id", what);
            OperationResult::failed_with_placeholder(format!(
                "Okta {what} creation succeeded but the response did not include an id: {}",
                response.body
            ))
        }
    }
}
