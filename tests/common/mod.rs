//! Shared test utilities.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tropokta::{
    CredentialProvider, Decrypter, Dispatcher, HttpCallbackReporter, LifecycleEvent, OktaClient,
    ProviderConfig, ProviderError, ProviderResult, SecretToken,
};
use wiremock::MockServer;

/// Plaintext token every test client authenticates with.
pub const TEST_TOKEN: &str = "00test-token";
/// Base64 ciphertext handed to the credential provider.
pub const TEST_CIPHERTEXT: &str = "Y2lwaGVydGV4dA==";

/// Decrypter that returns [`TEST_TOKEN`] and counts calls.
#[derive(Clone, Default)]
pub struct StaticDecrypter {
    pub calls: Arc<AtomicUsize>,
}

impl StaticDecrypter {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Decrypter for StaticDecrypter {
    fn decrypt(
        &self,
        _ciphertext: Vec<u8>,
    ) -> impl Future<Output = ProviderResult<SecretToken>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(SecretToken::new(TEST_TOKEN)) }
    }
}

/// Decrypter that always fails, like KMS with a missing grant.
pub struct DeniedDecrypter;

impl Decrypter for DeniedDecrypter {
    fn decrypt(
        &self,
        _ciphertext: Vec<u8>,
    ) -> impl Future<Output = ProviderResult<SecretToken>> + Send {
        async {
            Err(ProviderError::credential(
                "KMS decrypt failed: AccessDeniedException",
            ))
        }
    }
}

pub fn config_for(base_url: &str) -> ProviderConfig {
    ProviderConfig::new(base_url, TEST_CIPHERTEXT).unwrap()
}

pub fn okta_client_with<D>(base_url: &str, decrypter: D) -> OktaClient<D>
where
    D: Decrypter + Send + Sync,
{
    let config = config_for(base_url);
    let credentials = Arc::new(CredentialProvider::new(
        config.encrypted_token.clone(),
        decrypter,
    ));
    OktaClient::new(&config, credentials).unwrap()
}

pub fn okta_client(server: &MockServer) -> OktaClient<StaticDecrypter> {
    okta_client_with(&server.uri(), StaticDecrypter::default())
}

pub type TestDispatcher<D = StaticDecrypter> = Dispatcher<OktaClient<D>, HttpCallbackReporter>;

pub fn dispatcher_for(base_url: &str) -> TestDispatcher {
    dispatcher_with(base_url, StaticDecrypter::default())
}

pub fn dispatcher_with<D>(base_url: &str, decrypter: D) -> TestDispatcher<D>
where
    D: Decrypter + Send + Sync,
{
    Dispatcher::new(
        okta_client_with(base_url, decrypter),
        HttpCallbackReporter::with_http_client(reqwest::Client::new()),
    )
}

/// Response URL path on the callback mock server.
pub const CALLBACK_PATH: &str = "/cloudformation-response";

pub fn callback_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), CALLBACK_PATH)
}

/// Build an event with the identifiers CloudFormation always sends.
pub fn event(
    request_type: &str,
    resource_type: &str,
    response_url: &str,
    physical_resource_id: Option<&str>,
    properties: Value,
) -> LifecycleEvent {
    let mut raw = json!({
        "RequestType": request_type,
        "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:tropokta",
        "ResponseURL": response_url,
        "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/okta/1",
        "RequestId": "7bfe2d54-710d-4b22-a5d5-3f0d2d6c6a1e",
        "LogicalResourceId": "OktaResource",
        "ResourceType": resource_type,
        "ResourceProperties": properties,
    });
    if let Some(id) = physical_resource_id {
        raw["PhysicalResourceId"] = json!(id);
    }
    serde_json::from_value(raw).unwrap()
}

/// The single callback body the mock response URL received.
pub async fn reported_payload(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    let callbacks: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == CALLBACK_PATH)
        .collect();
    assert_eq!(callbacks.len(), 1, "expected exactly one callback");
    serde_json::from_slice(&callbacks[0].body).unwrap()
}

pub fn is_uuid(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok())
}
