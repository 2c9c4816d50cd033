//! Integration tests for list resources.
//!
//! These tests run lists through the real HTTP transport against a mock
//! server and check the URLs that filters and slices produce.

use serde_json::json;
use typepad::api::{Asset, Group, Relationship, User, COMMENT, PHOTO, POST};
use typepad::clients::BatchClient;
use typepad::remote::{FilterValue, ListOf, Promise, RemoteError, RemoteType};
use typepad::{ApiEndpoint, ClientConfig, FilterError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BatchClient {
    let config = ClientConfig::builder()
        .endpoint(ApiEndpoint::new(server.uri()).unwrap())
        .build()
        .unwrap();
    BatchClient::new(config).unwrap()
}

fn group() -> Group {
    Group::from_dict(&json!({
        "objectTypes": ["tag:api.typepad.com,2009:Group"],
        "urlId": "g1",
    }))
    .unwrap()
}

#[tokio::test]
async fn test_slice_is_sent_as_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups/g1/assets.json"))
        .and(query_param("start-index", "10"))
        .and(query_param("max-results", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalResults": 57,
            "startIndex": 10,
            "entries": [{"objectTypes": ["tag:api.typepad.com,2009:Post"], "title": "Tenth"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.batch_request().unwrap();
    let page = group()
        .assets(&client)
        .unwrap()
        .slice(&client, 10..20)
        .unwrap();
    page.register(&client).unwrap();
    assert_eq!(client.complete_batch().await.unwrap(), 1);

    let page = page.deliver(&client).await.unwrap();
    assert_eq!(page.count(), 57);
    assert_eq!(page.len(), 1);
    assert_eq!(page.get(0).unwrap().title(), Some("Tenth"));
}

#[tokio::test]
async fn test_entries_keep_their_most_specific_class() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups/g1/assets.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalResults": 3,
            "entries": [
                {"objectTypes": ["tag:api.typepad.com,2009:Post"], "title": "Post"},
                {"objectTypes": ["tag:api.typepad.com,2009:Photo"], "title": "Photo"},
                {"objectTypes": ["tag:api.typepad.com,2009:Comment"], "content": "Comment"},
            ],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.batch_request().unwrap();
    let assets: Promise<ListOf<Asset>> = group().assets(&client).unwrap();
    let count = assets.count(&client).await.unwrap();
    assert_eq!(count, 3);

    let classes: Vec<_> = assets
        .value()
        .unwrap()
        .iter()
        .map(|asset| asset.class())
        .collect();
    assert_eq!(classes, [&POST, &PHOTO, &COMMENT]);
    let second = assets.entry(&client, 1).await.unwrap().unwrap();
    assert_eq!(second.to_string(), "Photo");
}

#[tokio::test]
async fn test_filters_are_written_in_canonical_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/u1/relationships/@follower/@by-group/g1.json"))
        .and(query_param("max-results", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalResults": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = User::from_dict(&json!({"urlId": "u1"})).unwrap();
    let group = group();

    client.batch_request().unwrap();
    let followers: Promise<ListOf<Relationship>> = user
        .relationships(&client)
        .unwrap()
        .filter(
            &client,
            &[
                ("by_group", FilterValue::entity(&group)),
                ("follower", true.into()),
            ],
        )
        .unwrap()
        .slice(&client, ..5)
        .unwrap();
    followers.register(&client).unwrap();
    assert_eq!(client.complete_batch().await.unwrap(), 1);

    let followers = followers.deliver(&client).await.unwrap();
    assert!(followers.is_empty());
    assert_eq!(followers.count(), 0);
}

#[tokio::test]
async fn test_filtering_leaves_the_original_untouched() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let assets = group().assets(&client).unwrap();

    let photos = assets.filter(&client, &[("content", "photo".into())]).unwrap();
    assert_eq!(photos.url().path(), "/groups/g1/assets/@photo.json");
    assert_eq!(assets.url().path(), "/groups/g1/assets.json");

    let everything = photos.filter(&client, &[("photo", false.into())]).unwrap();
    assert_eq!(everything.url().path(), "/groups/g1/assets.json");
}

#[tokio::test]
async fn test_entity_filter_needs_url_id() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let anonymous = User::from_dict(&json!({"displayName": "Nobody"})).unwrap();

    let err = group()
        .assets(&client)
        .unwrap()
        .filter(&client, &[("by_user", FilterValue::entity(&anonymous))])
        .unwrap_err();
    assert!(matches!(
        err,
        RemoteError::Filter(FilterError::EntityWithoutUrlId { .. })
    ));
}
