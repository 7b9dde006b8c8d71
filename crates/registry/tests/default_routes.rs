use std::sync::Arc;

use common::{ApiRequest, HttpMethod};
use serde_json::{json, Value};
use store::MemoryStore;

use registry::build_api;

fn registry_api() -> api::Api {
    build_api(Arc::new(MemoryStore::new()), None).expect("assembly")
}

fn post(path: &str, body: &Value) -> ApiRequest {
    ApiRequest::builder(HttpMethod::Post, path)
        .json_body(body)
        .expect("serialize body")
        .build()
}

fn put(path: &str, body: &Value) -> ApiRequest {
    ApiRequest::builder(HttpMethod::Put, path)
        .json_body(body)
        .expect("serialize body")
        .build()
}

fn get(path: &str) -> ApiRequest {
    ApiRequest::builder(HttpMethod::Get, path).build()
}

fn delete(path: &str) -> ApiRequest {
    ApiRequest::builder(HttpMethod::Delete, path).build()
}

#[tokio::test]
async fn post_service_then_list_shows_exactly_that_item() -> anyhow::Result<()> {
    let api = registry_api();

    let created = api.handle(post("/services", &json!({"name": "Encoder"}))).await;
    assert_eq!(created.status(), 201);
    let body = created.body_json().unwrap();
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["name"], "Encoder");
    assert_eq!(
        created.headers().get("location"),
        Some(format!("/services/{id}").as_str())
    );

    let listed = api.handle(get("/services")).await;
    assert_eq!(listed.status(), 200);
    let results = listed.body_json().unwrap();
    let items = results["results"].as_array().unwrap().clone();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0], body);
    Ok(())
}

#[tokio::test]
async fn create_then_get_round_trips_for_both_types() -> anyhow::Result<()> {
    let api = registry_api();

    let service = api
        .handle(post("/services", &json!({"name": "Encoder", "jobType": "TransformJob"})))
        .await;
    assert_eq!(service.status(), 201);
    let service_body = service.body_json().unwrap();
    let service_id = service_body["id"].as_str().unwrap();
    let fetched = api.handle(get(&format!("/services/{service_id}"))).await;
    assert_eq!(fetched.status(), 200);
    assert_eq!(fetched.body_json().unwrap(), service_body);

    let profile = api
        .handle(post(
            "/job-profiles",
            &json!({
                "name": "ExtractThumbnail",
                "inputParameters": [
                    {"parameterName": "inputFile", "parameterType": "Locator"}
                ]
            }),
        ))
        .await;
    assert_eq!(profile.status(), 201);
    let profile_body = profile.body_json().unwrap();
    let profile_id = profile_body["id"].as_str().unwrap();
    assert_eq!(
        profile.headers().get("location"),
        Some(format!("/job-profiles/{profile_id}").as_str())
    );
    let fetched = api.handle(get(&format!("/job-profiles/{profile_id}"))).await;
    assert_eq!(fetched.body_json().unwrap(), profile_body);
    Ok(())
}

#[tokio::test]
async fn deletion_is_observable() -> anyhow::Result<()> {
    let api = registry_api();
    let created = api
        .handle(post("/services", &json!({"id": "svc-1", "name": "Encoder"})))
        .await;
    assert_eq!(created.status(), 201);

    assert_eq!(api.handle(delete("/services/svc-1")).await.status(), 204);
    assert_eq!(api.handle(get("/services/svc-1")).await.status(), 404);
    assert_eq!(api.handle(delete("/services/svc-1")).await.status(), 404);
    Ok(())
}

#[tokio::test]
async fn update_missing_service_is_404_without_mutation() -> anyhow::Result<()> {
    let api = registry_api();
    let resp = api
        .handle(put("/services/ghost", &json!({"name": "Encoder"})))
        .await;
    assert_eq!(resp.status(), 404);

    let listed = api.handle(get("/services")).await.body_json().unwrap();
    assert!(listed["results"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn duplicate_create_conflicts_and_keeps_existing() -> anyhow::Result<()> {
    let api = registry_api();
    api.handle(post("/services", &json!({"id": "svc-1", "name": "original"})))
        .await;

    let conflict = api
        .handle(post("/services", &json!({"id": "svc-1", "name": "imposter"})))
        .await;
    assert_eq!(conflict.status(), 409);

    let kept = api.handle(get("/services/svc-1")).await.body_json().unwrap();
    assert_eq!(kept["name"], "original");
    Ok(())
}

#[tokio::test]
async fn update_replaces_and_restamps() -> anyhow::Result<()> {
    let api = registry_api();
    let created = api
        .handle(post("/services", &json!({"id": "svc-1", "name": "before"})))
        .await
        .body_json()
        .unwrap();

    let updated = api
        .handle(put(
            "/services/svc-1",
            &json!({"id": "svc-1", "name": "after", "dateCreated": created["dateCreated"]}),
        ))
        .await;
    assert_eq!(updated.status(), 200);
    let body = updated.body_json().unwrap();
    assert_eq!(body["name"], "after");
    assert_eq!(body["dateCreated"], created["dateCreated"]);
    assert!(body["dateModified"].is_string());

    let mismatched = api
        .handle(put("/services/svc-1", &json!({"id": "svc-2", "name": "x"})))
        .await;
    assert_eq!(mismatched.status(), 400);
    Ok(())
}

#[tokio::test]
async fn list_filters_by_query_fields() -> anyhow::Result<()> {
    let api = registry_api();
    for (id, name, job_type) in [
        ("a", "Encoder", "TransformJob"),
        ("b", "Decoder", "TransformJob"),
        ("c", "Transcriber", "AIJob"),
    ] {
        let resp = api
            .handle(post(
                "/services",
                &json!({"id": id, "name": name, "jobType": job_type}),
            ))
            .await;
        assert_eq!(resp.status(), 201);
    }

    let transforms = api
        .handle(get("/services?jobType=TransformJob"))
        .await
        .body_json()
        .unwrap();
    assert_eq!(transforms["results"].as_array().unwrap().len(), 2);

    let one = api
        .handle(get("/services?jobType=TransformJob&name=Decoder"))
        .await
        .body_json()
        .unwrap();
    let items = one["results"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "b");
    Ok(())
}

#[tokio::test]
async fn list_paginates_with_continuation_token() -> anyhow::Result<()> {
    let api = registry_api();
    for id in ["a", "b", "c", "d", "e"] {
        api.handle(post("/services", &json!({"id": id, "name": "svc"})))
            .await;
    }

    let mut collected = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let path = match &token {
            Some(t) => format!("/services?pageSize=2&pageToken={t}"),
            None => "/services?pageSize=2".to_string(),
        };
        let page = api.handle(get(&path)).await.body_json().unwrap();
        for item in page["results"].as_array().unwrap() {
            collected.push(item["id"].as_str().unwrap().to_string());
        }
        match page.get("nextPageToken").and_then(Value::as_str) {
            Some(t) => token = Some(t.to_string()),
            None => break,
        }
    }
    assert_eq!(collected, ["a", "b", "c", "d", "e"]);
    Ok(())
}

#[tokio::test]
async fn malformed_service_body_is_400() -> anyhow::Result<()> {
    let api = registry_api();
    // required `name` missing
    let resp = api.handle(post("/services", &json!({"jobType": "x"}))).await;
    assert_eq!(resp.status(), 400);
    let body = resp.body_json().unwrap();
    assert!(body["error"].as_str().unwrap().contains("Service"));
    Ok(())
}

#[tokio::test]
async fn resource_types_do_not_bleed_into_each_other() -> anyhow::Result<()> {
    let api = registry_api();
    api.handle(post("/services", &json!({"id": "x", "name": "Encoder"})))
        .await;
    assert_eq!(api.handle(get("/job-profiles/x")).await.status(), 404);
    let profiles = api.handle(get("/job-profiles")).await.body_json().unwrap();
    assert!(profiles["results"].as_array().unwrap().is_empty());
    Ok(())
}
