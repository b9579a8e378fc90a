//! Okta REST API client.
//!
//! [`IdentityApi`] is the seam resource operations are written against: three
//! verbs taking a path relative to the organization URL and returning the raw
//! status and body. [`OktaClient`] is the reqwest implementation. Requests are
//! never retried; a network failure surfaces as
//! [`ProviderError::Transport`].

use crate::config::ProviderConfig;
use crate::credentials::{CredentialProvider, Decrypter};
use crate::error::{ProviderError, ProviderResult};
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Status and body of an identity-provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The `id` field of a JSON object body, if there is one.
    pub fn id(&self) -> Option<String> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        value.get("id")?.as_str().map(str::to_string)
    }
}

/// Minimal identity-provider API used by the resource operations.
pub trait IdentityApi {
    /// POST to `path`, with an optional JSON body.
    fn post(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> impl Future<Output = ProviderResult<ApiResponse>> + Send;

    /// PUT to `path` without a body.
    fn put(&self, path: &str) -> impl Future<Output = ProviderResult<ApiResponse>> + Send;

    /// DELETE `path`.
    fn delete(&self, path: &str) -> impl Future<Output = ProviderResult<ApiResponse>> + Send;
}

/// reqwest-based [`IdentityApi`] for an Okta organization.
pub struct OktaClient<D> {
    base_url: Url,
    auth_scheme: String,
    credentials: Arc<CredentialProvider<D>>,
    http_client: Client,
}

impl<D: Decrypter + Send + Sync> OktaClient<D> {
    /// Create a client using the configured base URL, scheme, and timeout.
    pub fn new(
        config: &ProviderConfig,
        credentials: Arc<CredentialProvider<D>>,
    ) -> ProviderResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("tropokta/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(config, credentials, http_client))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_http_client(
        config: &ProviderConfig,
        credentials: Arc<CredentialProvider<D>>,
        http_client: Client,
    ) -> Self {
        Self {
            base_url: config.base_url.clone(),
            auth_scheme: config.auth_scheme.clone(),
            credentials,
            http_client,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL with URL-join rules: an absolute
    /// path replaces the base URL's path.
    pub fn url(&self, path: &str) -> ProviderResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::config(format!("cannot join '{path}' onto base URL: {e}")))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ProviderResult<ApiResponse> {
        let url = self.url(path)?;
        let token = self.credentials.token().await?;

        debug!("Okta request {} {}", method, url);

        let mut request = self
            .http_client
            .request(method.clone(), url)
            .header(AUTHORIZATION, format!("{} {}", self.auth_scheme, token.expose()))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("Okta response {} {} -> {}", method, path, status);
        Ok(ApiResponse { status, body })
    }
}

impl<D: Decrypter + Send + Sync> IdentityApi for OktaClient<D> {
    fn post(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> impl Future<Output = ProviderResult<ApiResponse>> + Send {
        self.send(Method::POST, path, body)
    }

    fn put(&self, path: &str) -> impl Future<Output = ProviderResult<ApiResponse>> + Send {
        self.send(Method::PUT, path, None)
    }

    fn delete(&self, path: &str) -> impl Future<Output = ProviderResult<ApiResponse>> + Send {
        self.send(Method::DELETE, path, None)
    }
}
