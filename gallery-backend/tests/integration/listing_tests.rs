// tests/integration/listing_tests.rs

use axum::http::StatusCode;
use gallery_backend::api::dto::submission_dto::SubmissionRecord;
use tower::ServiceExt;

use crate::common::app_helper::setup_app;
use crate::common::request::{body_json, get_request};
use crate::common::test_data::insert_submitter;

#[tokio::test]
async fn test_empty_listing() {
    let app = setup_app().await;

    let res = app
        .router
        .clone()
        .oneshot(get_request("/api/submissions"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json: serde_json::Value = body_json(res).await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let app = setup_app().await;
    let db = &app.db.connection;

    insert_submitter(db, "A", "@a", &["https://cdn/a1"]).await;
    insert_submitter(db, "B", "@b", &["https://cdn/b1", "https://cdn/b2"]).await;
    insert_submitter(db, "C", "@c", &["https://cdn/c1"]).await;

    let res = app
        .router
        .clone()
        .oneshot(get_request("/api/submissions"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let submissions: Vec<SubmissionRecord> = body_json(res).await;
    let names: Vec<&str> = submissions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["C", "B", "A"]);
    assert_eq!(
        submissions[1].images,
        vec!["https://cdn/b1".to_string(), "https://cdn/b2".to_string()]
    );
}

#[tokio::test]
async fn test_submitter_without_images_has_empty_list() {
    let app = setup_app().await;
    insert_submitter(&app.db.connection, "Lonely", "@lonely", &[]).await;

    let res = app
        .router
        .clone()
        .oneshot(get_request("/api/submissions"))
        .await
        .unwrap();

    let json: serde_json::Value = body_json(res).await;
    assert_eq!(json[0]["name"], "Lonely");
    assert_eq!(json[0]["social_handle"], "@lonely");
    assert_eq!(json[0]["images"], serde_json::json!([]));
}

#[tokio::test]
async fn test_listing_failure_returns_generic_error() {
    let app = setup_app().await;
    insert_submitter(&app.db.connection, "A", "@a", &["https://cdn/a1"]).await;
    app.db.rename_table("users", "users_x").await;

    let res = app
        .router
        .clone()
        .oneshot(get_request("/api/submissions"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = body_json(res).await;
    assert_eq!(
        json,
        serde_json::json!({ "error": "Failed to fetch submissions" })
    );
}

#[tokio::test]
async fn test_listing_failure_on_images_table() {
    let app = setup_app().await;
    insert_submitter(&app.db.connection, "A", "@a", &["https://cdn/a1"]).await;
    app.db.rename_table("images", "images_x").await;

    let res = app
        .router
        .clone()
        .oneshot(get_request("/api/submissions"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = body_json(res).await;
    assert_eq!(json["error"], "Failed to fetch submissions");
}
