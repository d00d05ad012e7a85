// gallery-backend/src/domain/submission.rs

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{image_model, submitter_model};
use crate::error::{AppError, AppResult};
use crate::utils::error_helper::convert_validation_errors;

/// アップロードされた画像1枚分のペイロード
#[derive(Clone)]
pub struct ImagePayload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImagePayload {
    pub fn new(file_name: Option<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type: content_type.into(),
            data,
        }
    }

    /// Content-Type が `image/*` かどうか
    pub fn is_image(&self) -> bool {
        is_image_content_type(&self.content_type)
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .is_ok_and(|m| m.type_() == mime::IMAGE)
}

/// 1回の投稿（投稿者 + 1..=N 枚の画像）
#[derive(Debug, Clone, Validate)]
pub struct NewSubmission {
    #[validate(length(min = 1, max = 255, message = "Name is required (max 255 characters)"))]
    pub name: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Social handle is required (max 255 characters)"
    ))]
    pub social_handle: String,
    pub images: Vec<ImagePayload>,
}

impl NewSubmission {
    pub fn new(
        name: impl Into<String>,
        social_handle: impl Into<String>,
        images: Vec<ImagePayload>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            social_handle: social_handle.into().trim().to_string(),
            images,
        }
    }

    /// ストアに触れる前の入力検証
    pub fn validate_for(&self, max_images: usize) -> AppResult<()> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(validation_errors) => {
                match convert_validation_errors(validation_errors, "NewSubmission::validate_for") {
                    AppError::ValidationErrors(errors) => errors,
                    other => return Err(other),
                }
            }
        };

        if self.images.is_empty() {
            errors.push("images: At least one image is required".to_string());
        } else if self.images.len() > max_images {
            errors.push(format!("images: At most {} images are allowed", max_images));
        }

        for (index, image) in self.images.iter().enumerate() {
            if !image.is_image() {
                errors.push(format!(
                    "images[{}]: Content type {} is not an image",
                    index, image.content_type
                ));
            } else if image.data.is_empty() {
                errors.push(format!("images[{}]: File is empty", index));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationErrors(errors))
        }
    }
}

/// 一覧表示用のレコード（投稿者1人につき1件）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub id: i32,
    pub name: String,
    pub social_handle: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl SubmissionRecord {
    /// 投稿者の並び順を保ったまま、画像URLを投稿者ごとに ID 順でまとめる
    pub fn aggregate(
        submitters: Vec<submitter_model::Model>,
        mut images: Vec<image_model::Model>,
    ) -> Vec<Self> {
        images.sort_by_key(|image| image.id);

        let mut by_submitter: HashMap<i32, Vec<String>> = HashMap::new();
        for image in images {
            by_submitter
                .entry(image.user_id)
                .or_default()
                .push(image.image_url);
        }

        submitters
            .into_iter()
            .map(|submitter| Self {
                images: by_submitter.remove(&submitter.id).unwrap_or_default(),
                id: submitter.id,
                name: submitter.name,
                social_handle: submitter.social_handle,
            })
            .collect()
    }
}
