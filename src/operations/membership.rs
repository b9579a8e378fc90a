//! Group membership operations.
//!
//! A membership has no Okta id of its own; its physical id is
//! `{groupId}_{userId}`.

use super::group::GROUPS_PATH;
use super::{OperationResult, path_segment};
use crate::client::IdentityApi;
use crate::error::{DispatchError, ProviderResult};
use crate::resource::ResourceKind;
use log::{info, warn};

/// Physical id of the membership of `user_id` in `group_id`.
pub fn membership_id(group_id: &str, user_id: &str) -> String {
    format!("{group_id}_{user_id}")
}

fn membership_path(group_id: &str, user_id: &str) -> Result<String, DispatchError> {
    let group = path_segment(ResourceKind::Membership, "groupId", group_id)?;
    let user = path_segment(ResourceKind::Membership, "userId", user_id)?;
    Ok(format!("{GROUPS_PATH}/{group}/users/{user}"))
}

/// Add a user to a group; `204` succeeds with the membership id.
pub async fn create_membership<A: IdentityApi + Sync>(
    api: &A,
    group_id: &str,
    user_id: &str,
) -> ProviderResult<OperationResult> {
    let path = membership_path(group_id, user_id)?;
    info!("Adding Okta user {} to group {}", user_id, group_id);
    let response = api.put(&path).await?;
    Ok(membership_result(response.status, response.body, group_id, user_id))
}

/// Remove a user from a group; `204` succeeds with the membership id.
pub async fn delete_membership<A: IdentityApi + Sync>(
    api: &A,
    group_id: &str,
    user_id: &str,
) -> ProviderResult<OperationResult> {
    let path = membership_path(group_id, user_id)?;
    info!("Removing Okta user {} from group {}", user_id, group_id);
    let response = api.delete(&path).await?;
    Ok(membership_result(response.status, response.body, group_id, user_id))
}

fn membership_result(status: u16, body: String, group_id: &str, user_id: &str) -> OperationResult {
    if status != 204 {
        warn!(
            "Okta rejected membership change for user {} in group {} with status {}",
            user_id, group_id, status
        );
        return OperationResult::failed_with_placeholder(body);
    }
    OperationResult::success(Some(membership_id(group_id, user_id)))
}
