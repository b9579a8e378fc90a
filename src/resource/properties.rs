//! Typed resource properties built from a filtered `ResourceProperties` map.

use super::kind::ResourceKind;
use crate::error::DispatchError;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

/// Profile attributes for an Okta user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProperties {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub login: Option<String>,
}

/// Profile attributes for an Okta group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupProperties {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// The two ends of a group membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipProperties {
    pub group_id: Option<String>,
    pub user_id: Option<String>,
}

impl MembershipProperties {
    /// Both identifiers, or the name of the first missing one.
    pub fn ids(&self) -> Result<(&str, &str), DispatchError> {
        let group_id = present(self.group_id.as_deref())
            .ok_or_else(|| DispatchError::missing_identifier("Membership", "groupId"))?;
        let user_id = present(self.user_id.as_deref())
            .ok_or_else(|| DispatchError::missing_identifier("Membership", "userId"))?;
        Ok((group_id, user_id))
    }
}

/// Allow-listed attributes for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindProperties {
    User(UserProperties),
    Group(GroupProperties),
    Membership(MembershipProperties),
}

impl KindProperties {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::User(_) => ResourceKind::User,
            Self::Group(_) => ResourceKind::Group,
            Self::Membership(_) => ResourceKind::Membership,
        }
    }
}

/// Properties handed to a resource operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceProperties {
    pub attributes: KindProperties,
    /// The event's physical id, for operations on an existing object.
    pub physical_resource_id: Option<String>,
}

impl ResourceProperties {
    /// Filter raw `ResourceProperties` through the kind's allow-list.
    ///
    /// Keys outside the allow-list are dropped. Strings are taken as-is,
    /// numbers and booleans are stringified, anything else is dropped.
    pub fn filter(
        kind: ResourceKind,
        raw: &Map<String, Value>,
        physical_resource_id: Option<&str>,
    ) -> Self {
        let allowed = filter_allowed(kind, raw);
        let take = |key: &str| allowed.get(key).and_then(scalar_to_string);

        let attributes = match kind {
            ResourceKind::User => KindProperties::User(UserProperties {
                first_name: take("firstName"),
                last_name: take("lastName"),
                email: take("email"),
                login: take("login"),
            }),
            ResourceKind::Group => KindProperties::Group(GroupProperties {
                name: take("name"),
                description: take("description"),
            }),
            ResourceKind::Membership => KindProperties::Membership(MembershipProperties {
                group_id: take("groupId"),
                user_id: take("userId"),
            }),
        };

        Self {
            attributes,
            physical_resource_id: present(physical_resource_id).map(str::to_string),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.attributes.kind()
    }

    /// The physical id, required by operations that address an existing
    /// object.
    pub fn require_physical_id(&self) -> Result<&str, DispatchError> {
        present(self.physical_resource_id.as_deref()).ok_or_else(|| {
            DispatchError::missing_identifier(self.kind().as_str(), "PhysicalResourceId")
        })
    }
}

/// Keep only the keys the kind accepts.
pub fn filter_allowed(kind: ResourceKind, raw: &Map<String, Value>) -> Map<String, Value> {
    let allowed = kind.allowed_properties();
    raw.iter()
        .filter(|(key, _)| {
            let keep = allowed.contains(&key.as_str());
            if !keep {
                debug!("Dropping property '{}' not allowed for {}", key, kind);
            }
            keep
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
