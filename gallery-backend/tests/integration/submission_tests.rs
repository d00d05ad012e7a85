// tests/integration/submission_tests.rs

use axum::http::StatusCode;
use gallery_backend::api::dto::submission_dto::{SubmissionRecord, SubmitResponse};
use gallery_backend::error::ErrorResponse;
use std::time::Duration;
use tower::ServiceExt;

use crate::common::app_helper::{setup_app, setup_app_with_timeout};
use crate::common::mock_storage::MockStorageService;
use crate::common::request::{body_json, get_request, SubmitRequestBuilder};
use crate::common::test_data::{image_count, submitter_count};

#[tokio::test]
async fn test_submit_creates_submitter_with_images_in_order() {
    let app = setup_app().await;
    // 1枚目を遅らせて完了順と投稿順をずらす
    app.storage.delay_on("img1", Duration::from_millis(200));

    let req = SubmitRequestBuilder::new()
        .text("name", "Ada")
        .text("socialHandle", "@ada")
        .png("img1")
        .png("img2")
        .png("img3")
        .build();
    let res = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: SubmitResponse = body_json(res).await;
    assert_eq!(body, SubmitResponse::created(1));

    let res = app
        .router
        .clone()
        .oneshot(get_request("/api/submissions"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let submissions: Vec<SubmissionRecord> = body_json(res).await;
    assert_eq!(
        submissions,
        vec![SubmissionRecord {
            id: 1,
            name: "Ada".to_string(),
            social_handle: "@ada".to_string(),
            images: vec![
                MockStorageService::url_for("img1"),
                MockStorageService::url_for("img2"),
                MockStorageService::url_for("img3"),
            ],
        }]
    );
    assert_eq!(app.storage.call_count(), 3);
    assert_eq!(
        app.storage.received_file_names(),
        vec![
            Some("img1.png".to_string()),
            Some("img2.png".to_string()),
            Some("img3.png".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_submit_response_json_shape() {
    let app = setup_app().await;

    let req = SubmitRequestBuilder::new()
        .text("name", "Ada")
        .text("socialHandle", "@ada")
        .png("only")
        .build();
    let res = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json: serde_json::Value = body_json(res).await;
    assert_eq!(json, serde_json::json!({ "success": true, "userId": 1 }));
}

#[tokio::test]
async fn test_upload_failure_rolls_back_everything() {
    let app = setup_app().await;
    app.storage.fail_on("img2", "bucket unavailable");

    let req = SubmitRequestBuilder::new()
        .text("name", "Bo")
        .text("socialHandle", "@bo")
        .png("img1")
        .png("img2")
        .png("img3")
        .build();
    let res = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = body_json(res).await;
    assert_eq!(body.error, "Submission failed");
    assert!(body.details.is_none());

    assert_eq!(submitter_count(&app.db.connection).await, 0);
    assert_eq!(image_count(&app.db.connection).await, 0);

    let res = app
        .router
        .clone()
        .oneshot(get_request("/api/submissions"))
        .await
        .unwrap();
    let submissions: Vec<SubmissionRecord> = body_json(res).await;
    assert!(submissions.is_empty());
}

#[tokio::test]
async fn test_upload_timeout_rolls_back() {
    let app = setup_app_with_timeout(Duration::from_millis(200)).await;
    app.storage.delay_on("slow", Duration::from_secs(5));

    let req = SubmitRequestBuilder::new()
        .text("name", "Cy")
        .text("socialHandle", "@cy")
        .png("fast")
        .png("slow")
        .build();
    let res = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = body_json(res).await;
    assert_eq!(body.error, "Submission failed");

    assert_eq!(submitter_count(&app.db.connection).await, 0);
    assert_eq!(image_count(&app.db.connection).await, 0);
}

#[tokio::test]
async fn test_image_insert_failure_rolls_back_submitter() {
    let app = setup_app().await;
    app.db.rename_table("images", "images_x").await;

    let req = SubmitRequestBuilder::new()
        .text("name", "Di")
        .text("socialHandle", "@di")
        .png("img1")
        .png("img2")
        .build();
    let res = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = body_json(res).await;
    assert_eq!(body.error, "Submission failed");
    assert!(body.details.is_none());

    assert_eq!(submitter_count(&app.db.connection).await, 0);
}

#[tokio::test]
async fn test_failed_submission_does_not_block_next_one() {
    let app = setup_app().await;
    app.storage.fail_on("broken", "boom");

    let req = SubmitRequestBuilder::new()
        .text("name", "Bo")
        .text("socialHandle", "@bo")
        .png("broken")
        .build();
    let res = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let req = SubmitRequestBuilder::new()
        .text("name", "Bo")
        .text("socialHandle", "@bo")
        .png("fixed")
        .build();
    let res = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: SubmitResponse = body_json(res).await;
    assert!(body.success);
    assert_eq!(submitter_count(&app.db.connection).await, 1);
    assert_eq!(image_count(&app.db.connection).await, 1);
}

#[tokio::test]
async fn test_invalid_submissions_touch_nothing() {
    let app = setup_app().await;

    let cases = vec![
        (
            "blank name",
            SubmitRequestBuilder::new()
                .text("name", "   ")
                .text("socialHandle", "@ada")
                .png("img1"),
        ),
        (
            "missing social handle",
            SubmitRequestBuilder::new().text("name", "Ada").png("img1"),
        ),
        (
            "no images",
            SubmitRequestBuilder::new()
                .text("name", "Ada")
                .text("socialHandle", "@ada"),
        ),
        (
            "too many images",
            (1..=6).fold(
                SubmitRequestBuilder::new()
                    .text("name", "Ada")
                    .text("socialHandle", "@ada"),
                |builder, i| builder.png(&format!("img{}", i)),
            ),
        ),
        (
            "not an image",
            SubmitRequestBuilder::new()
                .text("name", "Ada")
                .text("socialHandle", "@ada")
                .file("cv.pdf", "application/pdf", b"%PDF-1.4"),
        ),
    ];

    for (label, builder) in cases {
        let res = app.router.clone().oneshot(builder.build()).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "case: {}", label);

        let body: ErrorResponse = body_json(res).await;
        assert_eq!(body.error, "Validation failed", "case: {}", label);
        assert!(
            body.details.is_some_and(|d| !d.is_empty()),
            "case: {}",
            label
        );
    }

    assert_eq!(app.storage.call_count(), 0);
    assert_eq!(submitter_count(&app.db.connection).await, 0);
    assert_eq!(image_count(&app.db.connection).await, 0);
}

#[tokio::test]
async fn test_five_images_is_accepted() {
    let app = setup_app().await;

    let builder = (1..=5).fold(
        SubmitRequestBuilder::new()
            .text("name", "Ada")
            .text("socialHandle", "@ada"),
        |builder, i| builder.png(&format!("img{}", i)),
    );
    let res = app.router.clone().oneshot(builder.build()).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(image_count(&app.db.connection).await, 5);
    assert_eq!(app.storage.stored_count(), 5);
}

#[tokio::test]
async fn test_malformed_multipart_is_bad_request() {
    let app = setup_app().await;

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/submit")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(r#"{"name":"Ada"}"#))
        .unwrap();
    let res = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(submitter_count(&app.db.connection).await, 0);
}
