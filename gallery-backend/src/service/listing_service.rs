// gallery-backend/src/service/listing_service.rs

use tracing::{debug, instrument};

use crate::db::DbPool;
use crate::domain::submission::SubmissionRecord;
use crate::error::AppResult;
use crate::repository::image_repository::ImageRepository;
use crate::repository::submitter_repository::SubmitterRepository;
use crate::utils::error_helper::fetch_error;

/// 投稿一覧（新しい投稿者順、画像URLは投稿者ごとに集約）
pub struct ListingService {
    submitter_repo: SubmitterRepository,
    image_repo: ImageRepository,
}

impl ListingService {
    pub fn new(db: DbPool) -> Self {
        Self {
            submitter_repo: SubmitterRepository::new(db.clone()),
            image_repo: ImageRepository::new(db),
        }
    }

    #[instrument(skip_all, name = "list_submissions")]
    pub async fn list_submissions(&self) -> AppResult<Vec<SubmissionRecord>> {
        let submitters = self
            .submitter_repo
            .find_all_newest_first()
            .await
            .map_err(|e| fetch_error(e, "listing_service::find_submitters"))?;

        let submitter_ids = submitters.iter().map(|s| s.id).collect();
        let images = self
            .image_repo
            .find_by_submitter_ids(submitter_ids)
            .await
            .map_err(|e| fetch_error(e, "listing_service::find_images"))?;

        debug!(
            submitters = submitters.len(),
            images = images.len(),
            "Loaded submissions"
        );

        Ok(SubmissionRecord::aggregate(submitters, images))
    }
}
