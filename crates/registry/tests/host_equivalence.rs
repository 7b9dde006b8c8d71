//! The property every host adapter leans on: two canonical requests that
//! describe the same logical call produce identical canonical responses, no
//! matter how the platform cased headers or encoded query strings.

use std::sync::Arc;

use common::{ApiRequest, Body, HttpMethod};
use serde_json::json;
use store::MemoryStore;

use registry::build_api;

fn registry_api() -> api::Api {
    build_api(Arc::new(MemoryStore::new()), None).expect("assembly")
}

#[tokio::test]
async fn header_casing_does_not_change_the_request() {
    let a = ApiRequest::builder(HttpMethod::Post, "/services")
        .header("Content-Type", "application/json")
        .header("X-Request-Id", "r1")
        .body(Body::json(b"{\"name\":\"Encoder\"}".to_vec()))
        .build();
    let b = ApiRequest::builder(HttpMethod::Post, "/services")
        .header("x-request-id", "r1")
        .header("CONTENT-TYPE", "application/json")
        .body(Body::json(b"{\"name\":\"Encoder\"}".to_vec()))
        .build();
    assert_eq!(a, b);
}

#[tokio::test]
async fn query_encoding_does_not_change_the_response() {
    let api = registry_api();
    let created = api
        .handle(
            ApiRequest::builder(HttpMethod::Post, "/services")
                .json_body(&json!({"id": "svc-1", "name": "hello world"}))
                .unwrap()
                .build(),
        )
        .await;
    assert_eq!(created.status(), 201);

    // three hosts, three encodings of the same query
    let plain = ApiRequest::builder(HttpMethod::Get, "/services?name=hello world").build();
    let plus = ApiRequest::builder(HttpMethod::Get, "/services?name=hello+world").build();
    let percent =
        ApiRequest::builder(HttpMethod::Get, "/services?na%6De=hello%20world").build();

    let first = api.handle(plain).await;
    assert_eq!(first.status(), 200);
    assert_eq!(
        first.body_json().unwrap()["results"].as_array().unwrap().len(),
        1
    );
    assert_eq!(first, api.handle(plus).await);
    assert_eq!(first, api.handle(percent).await);
}

#[tokio::test]
async fn builder_styles_produce_equal_requests() {
    let inline = ApiRequest::builder(HttpMethod::Get, "/services?jobType=TransformJob&name=x")
        .build();
    let paired = ApiRequest::builder(HttpMethod::Get, "/services")
        .query_pair("jobType", "TransformJob")
        .query_pair("name", "x")
        .build();
    assert_eq!(inline, paired);
}

#[tokio::test]
async fn trailing_slash_resolves_to_the_same_route() {
    let api = registry_api();
    api.handle(
        ApiRequest::builder(HttpMethod::Post, "/services")
            .json_body(&json!({"id": "svc-1", "name": "Encoder"}))
            .unwrap()
            .build(),
    )
    .await;

    let bare = api
        .handle(ApiRequest::builder(HttpMethod::Get, "/services/svc-1").build())
        .await;
    let slashed = api
        .handle(ApiRequest::builder(HttpMethod::Get, "/services/svc-1/").build())
        .await;
    assert_eq!(bare.status(), 200);
    assert_eq!(bare, slashed);
}

#[tokio::test]
async fn error_surface_is_uniform_across_paths() {
    let api = registry_api();

    let missing_item = api
        .handle(ApiRequest::builder(HttpMethod::Get, "/services/ghost").build())
        .await;
    let unknown_route = api
        .handle(ApiRequest::builder(HttpMethod::Get, "/nonsense").build())
        .await;

    assert_eq!(missing_item.status(), 404);
    assert_eq!(unknown_route.status(), 404);
    // both bodies use the one error shape
    assert!(missing_item.body_json().unwrap()["error"].is_string());
    assert!(unknown_route.body_json().unwrap()["error"].is_string());
}
