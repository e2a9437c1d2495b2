mod common;

use linkforge::api::dto::alias::AliasAvailabilityResponse;
use linkforge::api::dto::link::{ClickCountResponse, LinkListResponse, LinkResponse};
use linkforge::api::dto::resolve::ResolveResponse;
use linkforge::domain::entities::NewLink;
use linkforge::domain::repositories::LinkRepository;
use serde_json::{Value, json};
use std::time::Duration;

#[tokio::test]
async fn test_create_link_random_code() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com/page" }))
        .await;

    assert_eq!(response.status_code(), 201);

    let body: LinkResponse = response.json();
    assert_eq!(body.original_url, "https://example.com/page");
    assert_eq!(body.short_code.len(), 6);
    assert_eq!(body.short_url, format!("{}/{}", common::BASE_URL, body.short_code));
    assert_eq!(body.custom_alias, None);
    assert_eq!(body.click_count, 0);
    assert!(body.is_active);
}

#[tokio::test]
async fn test_create_link_with_alias() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "custom_alias": "my-link" }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: LinkResponse = response.json();
    assert_eq!(body.short_code, "my-link");
    assert_eq!(body.custom_alias.as_deref(), Some("my-link"));
}

#[tokio::test]
async fn test_create_link_alias_taken() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    server
        .post("/api/links")
        .json(&json!({ "url": "https://a.example", "custom_alias": "dup" }))
        .await;

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://b.example", "custom_alias": "dup" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "alias_taken");
}

#[tokio::test]
async fn test_create_link_alias_invalid() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "custom_alias": "has space" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "alias_invalid");
}

#[tokio::test]
async fn test_create_link_invalid_url() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    for url in ["", "not a url", "ftp://example.com/file"] {
        let response = server
            .post("/api/links")
            .json(&json!({ "url": url }))
            .await;

        assert_eq!(response.status_code(), 400, "url: {url:?}");
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "validation_error");
    }

    assert!(app.repository.is_empty());
}

#[tokio::test]
async fn test_create_link_trims_padded_url_before_length_check() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let url = format!("https://example.com/{}", "a".repeat(1980));
    assert_eq!(url.len(), 2000);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": format!("  {url} ") }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: LinkResponse = response.json();
    assert_eq!(body.original_url, url);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": format!("{url}a") }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_get_link_by_id_and_code() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let created: LinkResponse = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "custom_alias": "lookup" }))
        .await
        .json();

    let by_id: LinkResponse = server.get(&format!("/api/links/{}", created.id)).await.json();
    assert_eq!(by_id.short_code, "lookup");

    let by_code: LinkResponse = server.get("/api/codes/lookup").await.json();
    assert_eq!(by_code.id, created.id);

    let missing = server.get("/api/links/9999").await;
    assert_eq!(missing.status_code(), 404);

    let missing_code = server.get("/api/codes/nothing").await;
    assert_eq!(missing_code.status_code(), 404);
}

#[tokio::test]
async fn test_list_links_only_active() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    for alias in ["one", "two", "three"] {
        server
            .post("/api/links")
            .json(&json!({ "url": "https://example.com", "custom_alias": alias }))
            .await;
    }

    let two: LinkResponse = server.get("/api/codes/two").await.json();
    server
        .patch(&format!("/api/links/{}", two.id))
        .json(&json!({ "is_active": false }))
        .await;

    let body: LinkListResponse = server.get("/api/links").await.json();

    assert_eq!(body.pagination.total_items, 2);
    assert_eq!(body.items.len(), 2);
    assert!(body.items.iter().all(|l| l.short_code != "two"));
}

#[tokio::test]
async fn test_list_links_invalid_page() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let response = server.get("/api/links?page=0").await;
    assert_eq!(response.status_code(), 400);

    let response = server.get("/api/links?page_size=500").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_update_link_alias_semantics() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let created: LinkResponse = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .json();

    let renamed: LinkResponse = server
        .patch(&format!("/api/links/{}", created.id))
        .json(&json!({ "custom_alias": "fresh", "url": "https://example.org" }))
        .await
        .json();
    assert_eq!(renamed.short_code, "fresh");
    assert_eq!(renamed.original_url, "https://example.org");

    let old = server.get(&format!("/api/codes/{}", created.short_code)).await;
    assert_eq!(old.status_code(), 404);

    let cleared: LinkResponse = server
        .patch(&format!("/api/links/{}", created.id))
        .json(&json!({ "custom_alias": null }))
        .await
        .json();
    assert_eq!(cleared.short_code, "fresh");
    assert_eq!(cleared.custom_alias, None);
}

#[tokio::test]
async fn test_update_link_alias_taken() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    server
        .post("/api/links")
        .json(&json!({ "url": "https://a.example", "custom_alias": "first" }))
        .await;
    let second: LinkResponse = server
        .post("/api/links")
        .json(&json!({ "url": "https://b.example", "custom_alias": "second" }))
        .await
        .json();

    let response = server
        .patch(&format!("/api/links/{}", second.id))
        .json(&json!({ "custom_alias": "first" }))
        .await;

    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_update_missing_link() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let response = server
        .patch("/api/links/404")
        .json(&json!({ "is_active": false }))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_link() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let created: LinkResponse = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "custom_alias": "gone" }))
        .await
        .json();

    let response = server.delete(&format!("/api/links/{}", created.id)).await;
    assert_eq!(response.status_code(), 204);

    let again = server.delete(&format!("/api/links/{}", created.id)).await;
    assert_eq!(again.status_code(), 404);

    let availability: AliasAvailabilityResponse = server.get("/api/aliases/gone").await.json();
    assert!(availability.is_available);
}

#[tokio::test]
async fn test_increment_clicks() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let created: LinkResponse = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .json();

    let path = format!("/api/links/{}/clicks", created.id);
    server.post(&path).await;
    let body: ClickCountResponse = server.post(&path).await.json();

    assert_eq!(body.id, created.id);
    assert_eq!(body.click_count, 2);

    let missing = server.post("/api/links/777/clicks").await;
    assert_eq!(missing.status_code(), 404);
}

#[tokio::test]
async fn test_alias_availability() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "custom_alias": "taken" }))
        .await;

    let taken: AliasAvailabilityResponse = server.get("/api/aliases/taken").await.json();
    assert!(!taken.is_available);

    let free: AliasAvailabilityResponse = server.get("/api/aliases/free").await.json();
    assert_eq!(free.alias, "free");
    assert!(free.is_available);

    let reserved: AliasAvailabilityResponse = server.get("/api/aliases/health").await.json();
    assert!(!reserved.is_available);
}

#[tokio::test]
async fn test_resolve_endpoint_returns_pre_increment_count() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let created: LinkResponse = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com/x", "custom_alias": "rs" }))
        .await
        .json();

    let first: ResolveResponse = server.get("/api/resolve/rs").await.json();
    assert_eq!(first.original_url, "https://example.com/x");
    assert_eq!(first.short_code, "rs");
    assert_eq!(first.click_count, 0);

    common::wait_for_clicks(&app.repository, created.id, 1).await;

    let second: ResolveResponse = server.get("/api/resolve/rs").await.json();
    assert_eq!(second.click_count, 1);
}

#[tokio::test]
async fn test_invalid_deadline_header_rejected() {
    let app = common::create_test_app();
    let server = common::create_test_server(&app);

    let response = server
        .get("/api/links")
        .add_header("x-request-timeout-ms", "abc")
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_slow_store_times_out_with_504() {
    let (server, store) = common::create_slow_test_server(Duration::from_millis(300));
    let link = store
        .create(NewLink {
            original_url: "https://example.com".to_string(),
            short_code: "slow".to_string(),
            custom_alias: None,
        })
        .await
        .unwrap();

    let response = server
        .get(&format!("/api/links/{}", link.id))
        .add_header("x-request-timeout-ms", "10")
        .await;
    assert_eq!(response.status_code(), 504);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "timeout");

    let response = server
        .post("/api/links")
        .add_header("x-request-timeout-ms", "10")
        .json(&json!({ "url": "https://b.example", "custom_alias": "slow" }))
        .await;
    assert_eq!(response.status_code(), 504);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "timeout");
}

#[tokio::test]
async fn test_slow_store_within_deadline_keeps_other_errors() {
    let (server, store) = common::create_slow_test_server(Duration::from_millis(20));
    store
        .create(NewLink {
            original_url: "https://example.com".to_string(),
            short_code: "slow".to_string(),
            custom_alias: None,
        })
        .await
        .unwrap();

    let response = server
        .get("/api/links/999")
        .add_header("x-request-timeout-ms", "2000")
        .await;
    assert_eq!(response.status_code(), 404);

    let response = server
        .post("/api/links")
        .add_header("x-request-timeout-ms", "2000")
        .json(&json!({ "url": "https://b.example", "custom_alias": "slow" }))
        .await;
    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "alias_taken");
}
