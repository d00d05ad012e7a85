// gallery-backend/src/client/mod.rs

//! ギャラリーAPIのクライアント
//!
//! `GalleryClient` が HTTP 呼び出しを、`app::GalleryApp` がフォーム入力・読み込み中フラグ・
//! メッセージなどの一時的な画面状態を受け持つ。

pub mod app;

use std::path::Path;

use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::api::dto::submission_dto::{SubmissionRecord, SubmitResponse};
use crate::domain::submission::is_image_content_type;
use crate::error::ErrorResponse;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not an image")]
    NotAnImage(String),
}

/// フォームで選択された画像ファイル
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Result<Self, ClientError> {
        let file_name = file_name.into();
        let content_type = content_type.into();
        // `accept="image/*"` 相当
        if !is_image_content_type(&content_type) {
            return Err(ClientError::NotAnImage(file_name));
        }
        Ok(Self {
            file_name,
            content_type,
            data,
        })
    }

    /// 拡張子から Content-Type を推測してファイルを読み込む
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| display.clone());

        let content_type =
            content_type_for(path).ok_or_else(|| ClientError::NotAnImage(display.clone()))?;

        let data = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: display,
            source,
        })?;

        Self::new(file_name, content_type, data)
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(content_type)
}

/// `/api/submit` と `/api/submissions` を呼ぶ HTTP クライアント
#[derive(Clone, Debug)]
pub struct GalleryClient {
    http: reqwest::Client,
    base_url: String,
}

impl GalleryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn submit(
        &self,
        name: &str,
        social_handle: &str,
        images: &[ImageFile],
    ) -> Result<SubmitResponse, ClientError> {
        let mut form = Form::new()
            .text("name", name.to_string())
            .text("socialHandle", social_handle.to_string());

        for image in images {
            let part = Part::bytes(image.data.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part("images", part);
        }

        let response = self
            .http
            .post(format!("{}/api/submit", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse(response).await
    }

    pub async fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/submissions", self.base_url))
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
