// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

/// 呼び出し側に返す固定メッセージ（詳細はサーバーログにのみ出す）
pub const SUBMISSION_FAILED: &str = "Submission failed";
pub const FETCH_FAILED: &str = "Failed to fetch submissions";
pub const VALIDATION_FAILED: &str = "Validation failed";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload failed: {0}")]
    UploadError(String),

    #[error("Database error: {0}")]
    PersistenceError(#[from] DbErr),

    #[error("Fetch failed: {0}")]
    FetchError(String),
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::ValidationErrors(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(VALIDATION_FAILED, errors),
            ),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            // アップロード・永続化の失敗はどちらも投稿失敗として扱う
            AppError::UploadError(message) => {
                tracing::error!(error = %message, "Upload error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(SUBMISSION_FAILED),
                )
            }
            AppError::PersistenceError(db_err) => {
                tracing::error!(error = ?db_err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(SUBMISSION_FAILED),
                )
            }
            AppError::FetchError(message) => {
                tracing::error!(error = %message, "Fetch error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(FETCH_FAILED),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// validator のフィールドエラーを `field: message` 形式に平坦化
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    // HashMap 由来の順序を安定させる
    messages.sort();
    messages
}

/// エラーレスポンス構造 (`{"error": "..."}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}
