//! Error types for custom-resource handling.
//!
//! [`ProviderError`] covers every failure the crate can produce. Only
//! configuration, credential, and callback errors are terminal; dispatch and
//! transport errors are folded into a `FAILED` callback by the dispatcher so
//! the orchestrator always hears back.

/// Main error type for custom-resource operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Missing or invalid process configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The API token could not be decoded or decrypted
    #[error("Credential error: {message}")]
    Credential { message: String },

    /// The event cannot be routed to an operation
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Network-level failure talking to the identity provider
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The outcome could not be delivered to the response URL
    #[error("Callback to '{url}' failed: {message}")]
    Callback { url: String, message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons an event cannot be mapped to a resource operation.
///
/// These never crash an invocation: the dispatcher reports them back to the
/// orchestrator as a `FAILED` status with the error text as the reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// ResourceType does not name a supported Okta resource
    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    /// RequestType has no operation for this resource kind
    #[error("Unsupported request type '{request_type}' for resource type '{resource_type}'")]
    UnsupportedRequestType {
        resource_type: String,
        request_type: String,
    },

    /// An identifier needed to address the remote object is absent
    #[error("Missing required identifier '{name}' for {resource_kind} operation")]
    MissingIdentifier {
        resource_kind: String,
        name: String,
    },

    /// An identifier cannot be used as a single URL path segment
    #[error("Invalid identifier '{name}' for {resource_kind} operation: '{value}'")]
    InvalidIdentifier {
        resource_kind: String,
        name: String,
        value: String,
    },
}

// Convenience methods for creating common errors
impl ProviderError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a credential error
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    /// Create a callback delivery error
    pub fn callback(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Callback {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Whether the dispatcher can still report this error as a `FAILED`
    /// outcome instead of aborting the invocation.
    pub fn is_reportable(&self) -> bool {
        matches!(self, Self::Dispatch(_) | Self::Transport(_) | Self::Json(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error)
    }
}

impl DispatchError {
    /// Create a missing identifier error
    pub fn missing_identifier(resource_kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingIdentifier {
            resource_kind: resource_kind.into(),
            name: name.into(),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(
        resource_kind: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidIdentifier {
            resource_kind: resource_kind.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for custom-resource operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
