// gallery-backend/src/api/handlers/system_handler.rs

use axum::{routing::get, Json, Router};

use crate::api::dto::submission_dto::MessageResponse;

/// 死活監視用エンドポイント
pub async fn liveness_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Server is working!".to_string(),
    })
}

pub fn system_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/api/test", get(liveness_handler))
}
