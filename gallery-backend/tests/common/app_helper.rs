// tests/common/app_helper.rs

use axum::Router;
use gallery_backend::api::{app_router, AppState};
use gallery_backend::config::{AppConfig, SubmissionConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::common::db::TestDatabase;
use crate::common::mock_storage::MockStorageService;

pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

pub struct TestApp {
    pub router: Router,
    pub db: TestDatabase,
    pub storage: MockStorageService,
}

/// テスト用の設定（ストレージ資格情報はダミー）
pub fn test_config(database_url: &str) -> AppConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", database_url.to_string()),
        ("DATABASE_REQUIRE_TLS", "false".to_string()),
        ("ENVIRONMENT", "test".to_string()),
        ("CLOUDINARY_CLOUD_NAME", "demo".to_string()),
        ("CLOUDINARY_API_KEY", "key".to_string()),
        ("CLOUDINARY_API_SECRET", "secret".to_string()),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

pub async fn setup_app() -> TestApp {
    setup_app_with(SubmissionConfig::default()).await
}

/// 短いアップロードタイムアウトでアプリを組み立てる
pub async fn setup_app_with_timeout(timeout: Duration) -> TestApp {
    setup_app_with(SubmissionConfig {
        upload_timeout: timeout,
        ..SubmissionConfig::default()
    })
    .await
}

pub async fn setup_app_with(submission: SubmissionConfig) -> TestApp {
    crate::common::init_test_env();

    let db = TestDatabase::new().await;
    let storage = MockStorageService::new();

    let mut config = test_config(&db.url);
    config.submission = submission;

    let app_state = AppState::new(db.connection.clone(), Arc::new(storage.clone()), &config);

    TestApp {
        router: app_router(app_state),
        db,
        storage,
    }
}
