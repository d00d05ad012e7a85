// gallery-backend/src/service/storage_service.rs

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, Config};
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::domain::submission::ImagePayload;
use crate::error::AppResult;
use crate::utils::error_helper::upload_error;

/// 画像をまとめる論理フォルダ（キーのプレフィックス）
pub const DEFAULT_STORAGE_FOLDER: &str = "social-media-app";

const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// ストレージプロバイダーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Cloudinary,
    MinIO,
    R2,
    S3,
}

impl StorageProvider {
    fn parse(value: Option<String>) -> Result<Self, ConfigError> {
        match value
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "" | "cloudinary" => Ok(Self::Cloudinary),
            "minio" => Ok(Self::MinIO),
            "r2" | "cloudflare" | "cloudflare-r2" => Ok(Self::R2),
            "s3" | "aws" => Ok(Self::S3),
            other => Err(ConfigError::Invalid {
                name: "STORAGE_PROVIDER",
                value: other.to_string(),
            }),
        }
    }
}

/// ストレージサービスのトレイト定義
///
/// アップロードが成功した場合は、ブラウザから直接参照できる公開URLを返す。
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn upload(&self, image: ImagePayload) -> AppResult<String>;
}

/// アップロード時に渡すファイル名（ヘッダーに載せられる文字だけ残す）
fn upload_file_name(image: &ImagePayload) -> String {
    let sanitized: String = image
        .file_name
        .as_deref()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = sanitized.trim();

    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

// =============================================================================
// Cloudinary
// =============================================================================

/// Cloudinary の署名アルゴリズム（アカウント設定に合わせる。既定は SHA-1）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    fn parse(value: Option<String>) -> Result<Self, ConfigError> {
        match value.unwrap_or_default().trim().to_lowercase().as_str() {
            "" | "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(ConfigError::Invalid {
                name: "CLOUDINARY_SIGNATURE_ALGORITHM",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    pub folder: String,
    pub signature_algorithm: SignatureAlgorithm,
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("folder", &self.folder)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorResponse {
    error: CloudinaryErrorDetail,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorDetail {
    message: String,
}

/// Cloudinary アップロードAPIを使う実装
pub struct CloudinaryStorageService {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryStorageService {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

/// 署名対象パラメータをキー順に並べ、`k=v&k=v` + secret のダイジェストを16進で返す
pub fn sign_params(
    params: &[(&str, &str)],
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    match algorithm {
        SignatureAlgorithm::Sha1 => hex_digest::<Sha1>(&to_sign, api_secret),
        SignatureAlgorithm::Sha256 => hex_digest::<Sha256>(&to_sign, api_secret),
    }
}

fn hex_digest<D: Digest>(to_sign: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl StorageService for CloudinaryStorageService {
    async fn upload(&self, image: ImagePayload) -> AppResult<String> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let file_name = upload_file_name(&image);
        let file = Part::bytes(image.data)
            .file_name(file_name)
            .mime_str(&image.content_type)
            .map_err(|e| upload_error(e, "cloudinary_storage_service::upload"))?;

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("signature", signature);

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| upload_error(e, "cloudinary_storage_service::upload"))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<CloudinaryErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => "no error body".to_string(),
            };
            return Err(upload_error(
                format!("Cloudinary responded with {}: {}", status, message),
                "cloudinary_storage_service::upload",
            ));
        }

        let body: CloudinaryUploadResponse = response
            .json()
            .await
            .map_err(|e| upload_error(e, "cloudinary_storage_service::upload"))?;

        Ok(body.secure_url)
    }
}

// =============================================================================
// S3互換 (MinIO / R2 / AWS S3)
// =============================================================================

#[derive(Clone)]
pub struct S3Config {
    pub provider: StorageProvider,
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub public_url: String,
    pub folder: String,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("public_url", &self.public_url)
            .field("folder", &self.folder)
            .finish()
    }
}

/// S3互換ストレージサービスの実装
pub struct S3StorageService {
    client: Client,
    bucket: String,
    public_url: String,
    folder: String,
}

impl S3StorageService {
    pub fn new(config: S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "storage_service",
        );

        let mut s3_config_builder = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials);

        // MinIOはpath styleを強制
        if config.provider == StorageProvider::MinIO {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        Self {
            client: Client::from_conf(s3_config_builder.build()),
            bucket: config.bucket,
            public_url: config.public_url,
            folder: config.folder,
        }
    }
}

/// `folder/YYYY/MM/uuid.ext` 形式のオブジェクトキーを生成
pub fn object_key(folder: &str, content_type: &str) -> String {
    format!(
        "{}/{}/{}.{}",
        folder.trim_matches('/'),
        Utc::now().format("%Y/%m"),
        Uuid::new_v4(),
        image_extension(content_type)
    )
}

fn image_extension(content_type: &str) -> &'static str {
    match content_type.parse::<mime::Mime>() {
        Ok(m) if m.type_() == mime::IMAGE => match m.subtype().as_str() {
            "jpeg" | "pjpeg" => "jpg",
            "png" => "png",
            "gif" => "gif",
            "webp" => "webp",
            "bmp" => "bmp",
            "svg" => "svg",
            "avif" => "avif",
            "heic" => "heic",
            _ => "img",
        },
        _ => "bin",
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn upload(&self, image: ImagePayload) -> AppResult<String> {
        let key = object_key(&self.folder, &image.content_type);
        let content_disposition = format!("inline; filename=\"{}\"", upload_file_name(&image));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(image.data))
            .content_type(image.content_type)
            .content_disposition(content_disposition)
            .send()
            .await
            .map_err(|e| upload_error(e, "s3_storage_service::upload"))?;

        Ok(format!("{}/{}", self.public_url.trim_end_matches('/'), key))
    }
}

// =============================================================================
// 設定とファクトリ
// =============================================================================

/// ストレージ設定
#[derive(Clone, Debug)]
pub enum StorageConfig {
    Cloudinary(CloudinaryConfig),
    S3(S3Config),
}

impl StorageConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));
        let provider = StorageProvider::parse(lookup("STORAGE_PROVIDER"))?;
        let folder =
            lookup("STORAGE_FOLDER").unwrap_or_else(|| DEFAULT_STORAGE_FOLDER.to_string());

        // プロバイダーに応じたログ出力
        tracing::info!("Storage provider: {:?}", provider);

        match provider {
            StorageProvider::Cloudinary => Ok(Self::Cloudinary(CloudinaryConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
                api_base: lookup("CLOUDINARY_API_BASE")
                    .unwrap_or_else(|| CLOUDINARY_API_BASE.to_string()),
                folder,
                signature_algorithm: SignatureAlgorithm::parse(lookup(
                    "CLOUDINARY_SIGNATURE_ALGORITHM",
                ))?,
            })),
            StorageProvider::MinIO | StorageProvider::R2 | StorageProvider::S3 => {
                let endpoint = required("STORAGE_ENDPOINT")?;
                let bucket = required("STORAGE_BUCKET")?;
                let public_url = lookup("STORAGE_PUBLIC_URL").unwrap_or_else(|| {
                    format!("{}/{}", endpoint.trim_end_matches('/'), bucket)
                });

                Ok(Self::S3(S3Config {
                    provider,
                    region: required("STORAGE_REGION")?,
                    access_key: required("STORAGE_ACCESS_KEY")?,
                    secret_key: required("STORAGE_SECRET_KEY")?,
                    endpoint,
                    bucket,
                    public_url,
                    folder,
                }))
            }
        }
    }

    pub fn provider(&self) -> StorageProvider {
        match self {
            Self::Cloudinary(_) => StorageProvider::Cloudinary,
            Self::S3(config) => config.provider,
        }
    }

    pub fn folder(&self) -> &str {
        match self {
            Self::Cloudinary(config) => &config.folder,
            Self::S3(config) => &config.folder,
        }
    }
}

/// ストレージサービスのファクトリ関数
pub fn create_storage_service(config: &StorageConfig) -> Arc<dyn StorageService> {
    match config {
        StorageConfig::Cloudinary(config) => {
            Arc::new(CloudinaryStorageService::new(config.clone()))
        }
        // MinIOもR2もS3互換なので同じ実装を使用
        StorageConfig::S3(config) => Arc::new(S3StorageService::new(config.clone())),
    }
}
