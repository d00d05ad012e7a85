// tests/common/mock_storage.rs

use async_trait::async_trait;
use gallery_backend::domain::submission::ImagePayload;
use gallery_backend::error::AppResult;
use gallery_backend::service::storage_service::StorageService;
use gallery_backend::utils::error_helper::upload_error;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MOCK_STORAGE_BASE_URL: &str = "https://mock-storage.local/social-media-app";

/// テスト用のモックストレージサービス
///
/// 画像データを UTF-8 のラベルとして扱い、`{MOCK_STORAGE_BASE_URL}/{label}` を返す。
/// ラベル単位で失敗や遅延を差し込める。
#[derive(Clone, Default)]
pub struct MockStorageService {
    stored: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    file_names: Arc<Mutex<Vec<Option<String>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url_for(label: &str) -> String {
        format!("{}/{}", MOCK_STORAGE_BASE_URL, label)
    }

    pub fn fail_on(&self, label: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(label.to_string(), message.to_string());
    }

    pub fn delay_on(&self, label: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(label.to_string(), delay);
    }

    /// upload が呼ばれた回数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// upload に渡されたファイル名（ソート済み）
    pub fn received_file_names(&self) -> Vec<Option<String>> {
        let mut names = self.file_names.lock().unwrap().clone();
        names.sort();
        names
    }

    /// 正常に保存されたオブジェクト数
    pub fn stored_count(&self) -> usize {
        self.stored.lock().unwrap().len()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn upload(&self, image: ImagePayload) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.file_names.lock().unwrap().push(image.file_name.clone());
        let label = String::from_utf8_lossy(&image.data).into_owned();

        let delay = self.delays.lock().unwrap().get(&label).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().unwrap().get(&label).cloned();
        if let Some(message) = failure {
            return Err(upload_error(message, "mock_storage::upload"));
        }

        let url = Self::url_for(&label);
        self.stored.lock().unwrap().insert(url.clone(), image.data);
        Ok(url)
    }
}
