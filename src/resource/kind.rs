//! Resource kinds addressable through custom resource types.

use crate::error::DispatchError;
use std::fmt;

/// The Okta object a custom resource manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// An Okta user (`Custom::OktaUser`)
    User,
    /// An Okta group (`Custom::OktaGroup`)
    Group,
    /// A user's membership in a group (`Custom::OktaUserGroupAttachment`)
    Membership,
}

/// Type-name markers in match order. `OktaUserGroup` must come before
/// `OktaUser`, which is a prefix of it.
const TYPE_MARKERS: [(&str, ResourceKind); 3] = [
    ("OktaUserGroup", ResourceKind::Membership),
    ("OktaUser", ResourceKind::User),
    ("OktaGroup", ResourceKind::Group),
];

impl ResourceKind {
    /// Classify a CloudFormation `ResourceType` such as `Custom::OktaUser`.
    pub fn from_resource_type(resource_type: &str) -> Result<Self, DispatchError> {
        TYPE_MARKERS
            .iter()
            .find(|(marker, _)| resource_type.contains(marker))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| DispatchError::UnsupportedResourceType(resource_type.to_string()))
    }

    /// Property names accepted from `ResourceProperties` for this kind.
    pub fn allowed_properties(self) -> &'static [&'static str] {
        match self {
            Self::User => &["firstName", "lastName", "login", "email"],
            Self::Group => &["name", "description"],
            Self::Membership => &["groupId", "userId"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Group => "Group",
            Self::Membership => "Membership",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
