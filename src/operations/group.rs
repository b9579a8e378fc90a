//! Group operations.

use super::{OperationResult, created, path_segment};
use crate::client::IdentityApi;
use crate::error::ProviderResult;
use crate::resource::{GroupProperties, ResourceKind};
use log::{info, warn};
use serde_json::json;

pub const GROUPS_PATH: &str = "/api/v1/groups";

/// Create a group; `200` yields the new group's id.
pub async fn create_group<A: IdentityApi + Sync>(
    api: &A,
    group: &GroupProperties,
) -> ProviderResult<OperationResult> {
    info!("Creating Okta group {:?}", group.name);
    let body = json!({ "profile": group });
    let response = api.post(GROUPS_PATH, Some(body)).await?;
    Ok(created(response, 200, "group"))
}

/// Delete the group with the given id; `204` succeeds with no id, anything
/// else fails and echoes `id`.
pub async fn delete_group<A: IdentityApi + Sync>(
    api: &A,
    id: &str,
) -> ProviderResult<OperationResult> {
    let segment = path_segment(ResourceKind::Group, "PhysicalResourceId", id)?;
    info!("Deleting Okta group {}", id);
    let response = api.delete(&format!("{GROUPS_PATH}/{segment}")).await?;
    if response.status != 204 {
        warn!("Okta rejected deletion of group {} with status {}", id, response.status);
        return Ok(OperationResult::failed(response.body, Some(id)));
    }
    Ok(OperationResult::success(None::<String>))
}
