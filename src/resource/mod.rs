//! Resource model for the Okta custom resources.
//!
//! * [`ResourceKind`] - which Okta object a `ResourceType` manages
//! * [`ResourceProperties`] - allow-listed, typed properties for one event

pub mod kind;
pub mod properties;

pub use kind::ResourceKind;
pub use properties::{
    GroupProperties, KindProperties, MembershipProperties, ResourceProperties, UserProperties,
};
