// gallery-backend/src/service/submission_service.rs

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sea_orm::{DatabaseTransaction, TransactionTrait};
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

use crate::config::SubmissionConfig;
use crate::db::DbPool;
use crate::domain::submission::{ImagePayload, NewSubmission};
use crate::error::AppResult;
use crate::repository::image_repository::ImageRepository;
use crate::repository::submitter_repository::SubmitterRepository;
use crate::service::storage_service::StorageService;
use crate::utils::error_helper::{persistence_error, upload_error};

/// 投稿者の作成・画像アップロード・画像URLの記録を1つのトランザクションで行う
pub struct SubmissionService {
    db: DbPool,
    storage: Arc<dyn StorageService>,
    config: SubmissionConfig,
}

impl SubmissionService {
    pub fn new(db: DbPool, storage: Arc<dyn StorageService>, config: SubmissionConfig) -> Self {
        Self {
            db,
            storage,
            config,
        }
    }

    /// 投稿を登録し、作成された投稿者IDを返す
    ///
    /// 検証エラーはストアに触れる前に返す。アップロード・DBのどちらかで失敗した場合は
    /// 全体をロールバックする。その時点までにアップロード済みのオブジェクトは
    /// ストレージ側に残るため、URLを WARN ログに出力する。
    #[instrument(skip_all, name = "submission", fields(image_count = submission.images.len()))]
    pub async fn submit(&self, submission: NewSubmission) -> AppResult<i32> {
        submission.validate_for(self.config.max_images)?;

        let started = Instant::now();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| persistence_error(e, "submission_service::submit::begin"))?;

        let mut uploaded_urls = Vec::new();
        let result = match self
            .submit_in_transaction(&txn, submission, &mut uploaded_urls)
            .await
        {
            Ok(submitter_id) => txn
                .commit()
                .await
                .map(|_| submitter_id)
                .map_err(|e| persistence_error(e, "submission_service::submit::commit")),
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    error!(
                        original_error = %err,
                        rollback_error = %rollback_err,
                        "Failed to rollback submission transaction"
                    );
                }
                Err(err)
            }
        };

        match &result {
            Ok(submitter_id) => info!(
                submitter_id,
                uploaded = uploaded_urls.len(),
                duration_ms = started.elapsed().as_millis(),
                "Submission committed"
            ),
            Err(err) => {
                warn!(
                    error = %err,
                    duration_ms = started.elapsed().as_millis(),
                    "Submission rolled back"
                );
                if !uploaded_urls.is_empty() {
                    warn!(
                        orphaned_urls = ?uploaded_urls,
                        "Uploaded objects remain in storage after rollback"
                    );
                }
            }
        }

        result
    }

    async fn submit_in_transaction(
        &self,
        txn: &DatabaseTransaction,
        submission: NewSubmission,
        uploaded_urls: &mut Vec<String>,
    ) -> AppResult<i32> {
        let submitter =
            SubmitterRepository::create(txn, submission.name, submission.social_handle)
                .await
                .map_err(|e| persistence_error(e, "submission_service::create_submitter"))?;

        // アップロードは並列に実行し、トランザクションへの書き込みはこのタスクだけが行う。
        // JoinSet を途中で drop すると残りのアップロードは中断される。
        let mut uploads = JoinSet::new();
        for (index, image) in submission.images.into_iter().enumerate() {
            let storage = Arc::clone(&self.storage);
            let timeout = self.config.upload_timeout;
            uploads.spawn(async move { (index, upload_with_timeout(storage, image, timeout).await) });
        }

        // 完了順に届いた結果を投稿順に並べ直してから INSERT する
        let mut ready: BTreeMap<usize, String> = BTreeMap::new();
        let mut next_index = 0;
        while let Some(joined) = uploads.join_next().await {
            let (index, uploaded) =
                joined.map_err(|e| upload_error(e, "submission_service::join_upload"))?;
            let url = uploaded?;
            uploaded_urls.push(url.clone());
            ready.insert(index, url);

            while let Some(url) = ready.remove(&next_index) {
                ImageRepository::create(txn, submitter.id, url)
                    .await
                    .map_err(|e| persistence_error(e, "submission_service::create_image"))?;
                next_index += 1;
            }
        }

        Ok(submitter.id)
    }
}

async fn upload_with_timeout(
    storage: Arc<dyn StorageService>,
    image: ImagePayload,
    timeout: Duration,
) -> AppResult<String> {
    match tokio::time::timeout(timeout, storage.upload(image)).await {
        Ok(result) => result,
        Err(_) => Err(upload_error(
            format!("upload timed out after {}ms", timeout.as_millis()),
            "submission_service::upload",
        )),
    }
}
