// gallery-backend/src/api/handlers/submission_handler.rs

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info};

use crate::api::dto::submission_dto::{SubmissionRecord, SubmitResponse};
use crate::api::AppState;
use crate::domain::submission::{ImagePayload, NewSubmission};
use crate::error::{AppError, AppResult};

/// 投稿ハンドラー（multipart: name / socialHandle / images）
pub async fn submit_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<SubmitResponse>> {
    // 上限を1枚超えた時点で読み込みをやめる（超過は検証で弾く）
    let read_limit = app_state.config.submission.max_images + 1;

    let mut name = String::new();
    let mut social_handle = String::new();
    let mut images = Vec::new();

    // multipartデータを処理
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => {
                name = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field name: {}", e))
                })?;
            }
            "socialHandle" => {
                social_handle = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field socialHandle: {}", e))
                })?;
            }
            "images" => {
                if images.len() >= read_limit {
                    continue;
                }

                let file_name = field
                    .file_name()
                    .filter(|f| !f.is_empty())
                    .map(str::to_string);
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

                // ファイル未選択のフォームが送る空パートは無視
                if file_name.is_none() && data.is_empty() {
                    continue;
                }

                images.push(ImagePayload::new(file_name, content_type, data.to_vec()));
            }
            other => {
                debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let submission = NewSubmission::new(name, social_handle, images);
    info!(
        image_count = submission.images.len(),
        "Received submission"
    );

    let user_id = app_state.submission_service.submit(submission).await?;

    Ok(Json(SubmitResponse::created(user_id)))
}

/// 投稿一覧ハンドラー
pub async fn list_submissions_handler(
    State(app_state): State<AppState>,
) -> AppResult<Json<Vec<SubmissionRecord>>> {
    let submissions = app_state.listing_service.list_submissions().await?;
    Ok(Json(submissions))
}

pub fn submission_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/submit", post(submit_handler))
        .route("/api/submissions", get(list_submissions_handler))
        .with_state(app_state)
}
