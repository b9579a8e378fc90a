//! User operations.

use super::{OperationResult, created, path_segment};
use crate::client::IdentityApi;
use crate::error::ProviderResult;
use crate::resource::{ResourceKind, UserProperties};
use log::{info, warn};
use serde_json::json;

pub const USERS_PATH: &str = "/api/v1/users";

/// Create and activate a user from its profile attributes.
///
/// `200` yields the new user's id; any other status fails with the response
/// body as reason and a placeholder id.
pub async fn create_user<A: IdentityApi + Sync>(
    api: &A,
    user: &UserProperties,
) -> ProviderResult<OperationResult> {
    info!("Creating Okta user");
    let body = json!({ "profile": user });
    let response = api
        .post(&format!("{USERS_PATH}?activate=true"), Some(body))
        .await?;
    Ok(created(response, 200, "user"))
}

/// Deactivate, then delete, the user with the given id.
///
/// Okta only deletes deprovisioned users, so a deactivate call goes first.
/// Its outcome is logged and otherwise ignored: the delete status alone
/// decides the result. `200` succeeds with no id; anything else fails and
/// echoes `id` so the orchestrator keeps tracking the user.
pub async fn delete_user<A: IdentityApi + Sync>(
    api: &A,
    id: &str,
) -> ProviderResult<OperationResult> {
    let segment = path_segment(ResourceKind::User, "PhysicalResourceId", id)?;
    info!("Deleting Okta user {}", id);

    match api
        .post(&format!("{USERS_PATH}/{segment}/lifecycle/deactivate"), None)
        .await
    {
        Ok(response) if response.status != 200 => warn!(
            "Deactivating Okta user {} returned status {}",
            id, response.status
        ),
        Ok(_) => {}
        Err(e) => warn!("Deactivating Okta user {} failed: {}", id, e),
    }

    let response = api.delete(&format!("{USERS_PATH}/{segment}")).await?;
    if response.status != 200 {
        warn!("Okta rejected deletion of user {} with status {}", id, response.status);
        return Ok(OperationResult::failed(response.body, Some(id)));
    }
    Ok(OperationResult::success(None::<String>))
}
