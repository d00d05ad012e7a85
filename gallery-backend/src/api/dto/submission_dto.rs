// gallery-backend/src/api/dto/submission_dto.rs

use serde::{Deserialize, Serialize};

/// `POST /api/submit` 成功時のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(rename = "userId")]
    pub user_id: i32,
}

impl SubmitResponse {
    pub fn created(user_id: i32) -> Self {
        Self {
            success: true,
            user_id,
        }
    }
}

/// `GET /api/test` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

// 一覧のレコードはドメイン側の型をそのまま返す
pub use crate::domain::submission::SubmissionRecord;
