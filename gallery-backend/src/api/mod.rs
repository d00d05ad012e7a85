// gallery-backend/src/api/mod.rs
use crate::api::handlers::{submission_handler::submission_router, system_handler::system_router};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::logging::request_logging_middleware;
use crate::service::listing_service::ListingService;
use crate::service::storage_service::StorageService;
use crate::service::submission_service::SubmissionService;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::{middleware, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

/// アプリケーション状態（起動時に一度だけ組み立てて各ハンドラーに渡す）
#[derive(Clone)]
pub struct AppState {
    pub submission_service: Arc<SubmissionService>,
    pub listing_service: Arc<ListingService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: DbPool, storage: Arc<dyn StorageService>, app_config: &AppConfig) -> Self {
        Self {
            submission_service: Arc::new(SubmissionService::new(
                db.clone(),
                storage,
                app_config.submission.clone(),
            )),
            listing_service: Arc::new(ListingService::new(db)),
            config: Arc::new(app_config.clone()),
        }
    }
}

/// 全ルートとミドルウェアをまとめたルーター
pub fn app_router(app_state: AppState) -> Router {
    let cors = build_cors_layer(&app_state.config.cors_allowed_origins);
    let body_limit = app_state.config.server.body_limit;

    Router::new()
        .merge(system_router())
        .merge(submission_router(app_state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// 許可オリジンのみ credentials 付きで受け付ける CORS 設定
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
