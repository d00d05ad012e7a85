// gallery-backend/src/utils/error_helper.rs

//! エラーハンドリングの統一化ヘルパー
//!
//! 詳細はここでログに出し、呼び出し側には分類済みの AppError だけを返します。

use crate::error::{flatten_validation_errors, AppError};
use sea_orm::DbErr;
use tracing::{error, warn};
use validator::ValidationErrors;

// =============================================================================
// バリデーションエラー処理の統一
// =============================================================================

/// validatorのValidationErrorsをAppErrorに変換する統一処理
///
/// # Arguments
/// * `validation_errors` - validator crate からのバリデーションエラー
/// * `context` - エラーが発生したコンテキスト（ログ用）
pub fn convert_validation_errors(validation_errors: ValidationErrors, context: &str) -> AppError {
    let errors = flatten_validation_errors(&validation_errors);
    warn!(
        context = %context,
        error_count = errors.len(),
        "Validation failed"
    );
    AppError::ValidationErrors(errors)
}

// =============================================================================
// ログ付きエラー変換パターン
// =============================================================================

/// オブジェクトストレージへのアップロード失敗
pub fn upload_error<E: std::fmt::Display>(error: E, context: &str) -> AppError {
    error!(
        error = %error,
        context = %context,
        "Object storage upload failed"
    );
    AppError::UploadError(error.to_string())
}

/// 書き込み系のデータベースエラー
pub fn persistence_error(db_err: DbErr, context: &str) -> AppError {
    error!(
        error = %db_err,
        context = %context,
        "Database write failed"
    );
    AppError::PersistenceError(db_err)
}

/// 読み込み系のデータベースエラー
pub fn fetch_error<E: std::fmt::Display>(error: E, context: &str) -> AppError {
    error!(
        error = %error,
        context = %context,
        "Database read failed"
    );
    AppError::FetchError(error.to_string())
}
