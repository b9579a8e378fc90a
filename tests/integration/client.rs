//! `OktaClient` tests: headers, URL resolution, token caching, transport
//! failures.

use crate::common::{StaticDecrypter, TEST_TOKEN, okta_client, okta_client_with};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use tropokta::{IdentityApi, ProviderError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_post_sends_auth_and_json_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .and(query_param("activate", "true"))
        .and(header("Authorization", format!("SSWS {TEST_TOKEN}").as_str()))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"profile": {"login": "ada@example.com"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "00u1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = okta_client(&server);
    let response = assert_ok!(
        client
            .post(
                "/api/v1/users?activate=true",
                Some(json!({"profile": {"login": "ada@example.com"}})),
            )
            .await
    );

    assert_eq!(response.status, 200);
    assert_eq!(response.id().as_deref(), Some("00u1"));
}

#[tokio::test]
async fn test_put_and_delete_return_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/groups/g1/users/u1"))
        .and(header("Authorization", format!("SSWS {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/groups/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found: missing"))
        .expect(1)
        .mount(&server)
        .await;

    let client = okta_client(&server);

    let put = assert_ok!(client.put("/api/v1/groups/g1/users/u1").await);
    assert_eq!((put.status, put.body.as_str()), (204, ""));

    let delete = assert_ok!(client.delete("/api/v1/groups/missing").await);
    assert_eq!((delete.status, delete.body.as_str()), (404, "Not found: missing"));
}

#[tokio::test]
async fn test_absolute_paths_replace_base_path() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/groups/g1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = okta_client_with(
        &format!("{}/ignored/prefix/", server.uri()),
        StaticDecrypter::default(),
    );
    assert_eq!(
        client.url("/api/v1/groups/g1").unwrap().path(),
        "/api/v1/groups/g1"
    );

    let response = assert_ok!(client.delete("/api/v1/groups/g1").await);
    assert_eq!(response.status, 204);
}

#[tokio::test]
async fn test_token_is_decrypted_once_across_requests() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let decrypter = StaticDecrypter::default();
    let client = okta_client_with(&server.uri(), decrypter.clone());

    for id in ["g1", "g2", "g3"] {
        assert_ok!(client.delete(&format!("/api/v1/groups/{id}")).await);
    }
    assert_eq!(decrypter.call_count(), 1);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Port 1 is reserved and refuses connections.
    let client = okta_client_with("http://127.0.0.1:1", StaticDecrypter::default());

    let error = assert_err!(client.put("/api/v1/groups/g1/users/u1").await);
    assert!(matches!(error, ProviderError::Transport(_)));
    assert!(error.is_reportable());
}
