//! End-to-end tests through the complete router, including the middleware
//! chain and the routes outside it.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{IDENTITY_HEADER, TestDatabase, identity_header};
use tower::ServiceExt;
use update_router_api::{AppState, app, config::ApiConfig};

const ROOT: &str = "/api/module-update-router/v1";

fn api_config() -> ApiConfig {
    ApiConfig {
        path_prefixes: vec!["/api".to_string(), "/r/insights/platform".to_string()],
        app_name: "module-update-router".to_string(),
        api_version: "v1".to_string(),
    }
}

fn router(db: &TestDatabase) -> Router {
    app(&AppState::new(db.store(), None), &api_config())
}

async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json_body(body: Body) -> Value {
    serde_json::from_str(&body_string(body).await).unwrap()
}

fn get(uri: &str, account: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(account) = account {
        builder = builder.header(IDENTITY_HEADER, identity_header(account));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_ping_bypasses_identity() {
    let db = TestDatabase::new().await;

    let response = router(&db).oneshot(get("/ping", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_none());
    assert_eq!(body_string(response.into_body()).await, "OK");
}

#[tokio::test]
async fn test_channel_for_seeded_membership() {
    let db = TestDatabase::new().await;
    db.add_membership("insights-core", "540155").await;

    let testing = router(&db)
        .oneshot(get(&format!("{ROOT}/channel?module=insights-core"), Some("540155")))
        .await
        .unwrap();
    assert_eq!(testing.status(), StatusCode::OK);
    assert_eq!(json_body(testing.into_body()).await, json!({"url": "/testing"}));

    let release = router(&db)
        .oneshot(get(&format!("{ROOT}/channel?module=insights-core"), Some("111000")))
        .await
        .unwrap();
    assert_eq!(json_body(release.into_body()).await, json!({"url": "/release"}));
}

#[tokio::test]
async fn test_every_api_root_is_served() {
    let db = TestDatabase::new().await;

    let response = router(&db)
        .oneshot(get(
            "/r/insights/platform/module-update-router/v1/channel?module=insights-core",
            Some("540155"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_identity_envelope() {
    let db = TestDatabase::new().await;

    let response = router(&db)
        .oneshot(get(&format!("{ROOT}/channel?module=insights-core"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );
    assert!(response.headers().get("x-request-id").is_some());
    assert_eq!(
        json_body(response.into_body()).await,
        json!({"errors": [{"status": "Bad Request", "title": "missing X-Rh-Identity header"}]})
    );
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let db = TestDatabase::new().await;

    let response = router(&db)
        .oneshot(
            Request::builder()
                .uri(format!("{ROOT}/channel?module=insights-core"))
                .header(IDENTITY_HEADER, identity_header("540155"))
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
}

#[tokio::test]
async fn test_post_then_list_event() {
    let db = TestDatabase::new().await;
    let event = json!({
        "phase": "pre_update",
        "started_at": "2020-06-16T12:00:00Z",
        "exit": 0,
        "ended_at": "2020-06-16T12:00:02Z",
        "machine_id": "2d7e4b30-4b1e-4a4b-bd4c-4f5d3e3a1c00",
        "core_version": "3.0.156",
        "core_path": "/var/lib/insights/newest.egg"
    });

    let created = router(&db)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("{ROOT}/event"))
                .header(IDENTITY_HEADER, identity_header("540155"))
                .body(Body::from(event.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    assert!(body_string(created.into_body()).await.is_empty());

    let listed = router(&db)
        .oneshot(get(&format!("{ROOT}/event?limit=10"), Some("540155")))
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);

    let events = json_body(listed.into_body()).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["core_version"], "3.0.156");
    assert!(events[0].get("exception").is_none());
}

#[tokio::test]
async fn test_unknown_api_path_is_not_found() {
    let db = TestDatabase::new().await;

    let response = router(&db)
        .oneshot(get(&format!("{ROOT}/nothing-here"), Some("540155")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response.into_body()).await["errors"][0]["status"],
        "Not Found"
    );
}

#[tokio::test]
async fn test_ready_reports_database() {
    let db = TestDatabase::new().await;
    let router = router(&db);

    let ready = router.clone().oneshot(get("/ready", None)).await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(
        json_body(ready.into_body()).await,
        json!({"status": "ready", "database": "connected"})
    );

    db.store().close().await;

    let not_ready = router.oneshot(get("/ready", None)).await.unwrap();
    assert_eq!(not_ready.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_openapi_document() {
    let db = TestDatabase::new().await;

    let response = router(&db)
        .oneshot(get("/api-docs/openapi.json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response.into_body()).await;
    assert!(doc["paths"][format!("{ROOT}/channel")].is_object());
    assert!(doc["paths"][format!("{ROOT}/event")].is_object());
}
