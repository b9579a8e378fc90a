//! Process configuration for the custom-resource provider.
//!
//! Configuration is read once at startup from the environment. Any missing or
//! malformed value is a fatal [`ProviderError::Config`].

use crate::error::{ProviderError, ProviderResult};
use reqwest::Url;
use std::time::Duration;

/// Base URL of the Okta organization, e.g. `https://example.okta.com`.
pub const OKTA_URL_VAR: &str = "OKTA_URL";
/// Base64 KMS ciphertext of the Okta API token.
pub const OKTA_TOKEN_VAR: &str = "OKTA_TOKEN";
/// Authorization scheme placed before the token.
pub const OKTA_AUTH_SCHEME_VAR: &str = "OKTA_AUTH_SCHEME";
/// Per-request timeout in whole seconds.
pub const OKTA_REQUEST_TIMEOUT_VAR: &str = "OKTA_REQUEST_TIMEOUT_SECS";

/// Okta's API token scheme.
pub const DEFAULT_AUTH_SCHEME: &str = "SSWS";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by the Okta client, credential provider, and callback
/// reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base URL that relative API paths are joined onto.
    pub base_url: Url,

    /// Encrypted API token, still base64-encoded.
    pub encrypted_token: String,

    /// Scheme for the `Authorization` header. Defaults to `SSWS`.
    pub auth_scheme: String,

    /// Timeout applied to every outbound HTTP request.
    pub request_timeout: Duration,
}

impl ProviderConfig {
    /// Create a configuration with default scheme and timeout.
    pub fn new(base_url: &str, encrypted_token: impl Into<String>) -> ProviderResult<Self> {
        let config = Self {
            base_url: parse_base_url(base_url)?,
            encrypted_token: encrypted_token.into(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> ProviderResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> ProviderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = get(OKTA_URL_VAR)
            .ok_or_else(|| ProviderError::config(format!("{OKTA_URL_VAR} is not set")))?;
        let encrypted_token = get(OKTA_TOKEN_VAR)
            .ok_or_else(|| ProviderError::config(format!("{OKTA_TOKEN_VAR} is not set")))?;

        let mut config = Self::new(&base_url, encrypted_token)?;

        if let Some(scheme) = get(OKTA_AUTH_SCHEME_VAR) {
            config = config.with_auth_scheme(scheme.trim());
        }

        if let Some(raw) = get(OKTA_REQUEST_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ProviderError::config(format!(
                    "{OKTA_REQUEST_TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Override the authorization scheme.
    pub fn with_auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.auth_scheme = scheme.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check the invariants every consumer relies on.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.encrypted_token.trim().is_empty() {
            return Err(ProviderError::config("encrypted token cannot be empty"));
        }
        if self.auth_scheme.is_empty() || self.auth_scheme.contains(char::is_whitespace) {
            return Err(ProviderError::config(format!(
                "invalid authorization scheme '{}'",
                self.auth_scheme
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ProviderError::config("request timeout must be greater than zero"));
        }
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> ProviderResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ProviderError::config(format!("invalid base URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ProviderError::config(format!(
                "base URL must use http or https, got '{other}'"
            )));
        }
    }
    if url.cannot_be_a_base() {
        return Err(ProviderError::config(format!(
            "base URL '{raw}' cannot be used as a base"
        )));
    }

    Ok(url)
}
