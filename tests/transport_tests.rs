//! Integration tests for the HTTP transport and batch client.
//!
//! These tests verify request headers, batch ordering and status handling
//! against a mock server.

use std::sync::{Arc, Mutex};

use serde_json::json;
use typepad::api::{ApiObject, User};
use typepad::clients::{BatchClient, BatchError, HttpRequest, HttpTransport, Transport};
use typepad::remote::{Promise, RemoteError, RemoteType};
use typepad::{ApiEndpoint, ClientConfig};
use wiremock::matchers::{header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .endpoint(ApiEndpoint::new(server.uri()).unwrap())
        .user_agent_prefix("TestApp/2.0")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_transport_sends_default_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@self.json"))
        .and(header("Accept", "application/json"))
        .and(header_regex("User-Agent", r"^TestApp/2\.0 \| TypePad API Library v"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"displayName": "Mel"})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config_for(&server)).unwrap();
    let response = transport
        .submit(&HttpRequest::get(format!("{}/users/@self.json", server.uri())))
        .await
        .unwrap();

    assert!(response.is_ok());
    assert_eq!(response.json().unwrap()["displayName"], "Mel");
}

#[tokio::test]
async fn test_batch_callbacks_fire_in_registration_order() {
    let server = MockServer::start().await;
    for name in ["a", "b", "c"] {
        Mock::given(method("GET"))
            .and(path(format!("/users/{name}.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"urlId": name})))
            .mount(&server)
            .await;
    }

    let client = BatchClient::new(config_for(&server)).unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    client.batch_request().unwrap();
    for name in ["c", "a", "b"] {
        let order = Arc::clone(&order);
        client
            .batch(
                HttpRequest::get(format!("/users/{name}.json")),
                Box::new(move |result| {
                    let body = result.unwrap().json().unwrap();
                    order.lock().unwrap().push(body["urlId"].as_str().unwrap().to_string());
                }),
            )
            .unwrap();
    }
    assert_eq!(client.complete_batch().await.unwrap(), 3);

    assert_eq!(*order.lock().unwrap(), ["c", "a", "b"]);
    assert!(!client.has_open_batch());
}

#[tokio::test]
async fn test_batch_lifecycle_errors() {
    let server = MockServer::start().await;
    let client = BatchClient::new(config_for(&server)).unwrap();

    assert_eq!(
        client.complete_batch().await.unwrap_err(),
        BatchError::NoOpenBatch
    );
    client.batch_request().unwrap();
    assert_eq!(
        client.batch_request().unwrap_err(),
        BatchError::BatchAlreadyOpen
    );
    assert_eq!(client.complete_batch().await.unwrap(), 0);
}

#[tokio::test]
async fn test_server_error_fails_the_promise() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/broken.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = BatchClient::new(config_for(&server)).unwrap();
    client.batch_request().unwrap();
    let user = User::get_by_url_id(&client, "broken").unwrap();
    user.register(&client).unwrap();
    client.complete_batch().await.unwrap();

    let err = user.deliver(&client).await.unwrap_err();
    assert!(matches!(err, RemoteError::Status { code: 500, .. }));
    assert!(err.to_string().contains("/users/broken.json"));
}

#[tokio::test]
async fn test_fetched_object_remembers_its_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/6p00e5.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectTypes": ["tag:api.typepad.com,2009:User"],
            "urlId": "6p00e5",
            "displayName": "Mel",
        })))
        .mount(&server)
        .await;

    let client = BatchClient::new(config_for(&server)).unwrap();
    client.batch_request().unwrap();
    let object: Promise<ApiObject> = Promise::get(&client, "/users/6p00e5.json").unwrap();
    object.register(&client).unwrap();
    client.complete_batch().await.unwrap();

    let object = object.deliver(&client).await.unwrap();
    let ApiObject::User(user) = &*object else {
        panic!("expected a user, got {object:?}");
    };
    assert_eq!(
        user.location().map(|url| url.path()),
        Some("/users/6p00e5.json")
    );
    assert_eq!(user.make_self_link(&client), user.location().cloned());
}
