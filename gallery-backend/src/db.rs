// src/db.rs
use crate::config::AppConfig;
use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

pub type DbPool = DatabaseConnection;

/// TLS必須の場合は `sslmode=require` を付与する（暗号化のみ、証明書検証なし）
///
/// 接続文字列に sslmode が明示されている場合はそちらを優先する。
pub fn connection_url(database_url: &str, require_tls: bool) -> String {
    if !require_tls || database_url.contains("sslmode=") {
        return database_url.to_string();
    }

    let separator = if database_url.contains('?') { '&' } else { '?' };
    format!("{}{}sslmode=require", database_url, separator)
}

pub async fn create_db_pool(config: &AppConfig) -> Result<DbPool, DbErr> {
    let mut opt = ConnectOptions::new(connection_url(
        &config.database_url,
        config.database_require_tls,
    ));

    // アップロード中はトランザクションが接続を保持し続けるため、待ち時間は長めにとる
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(config.submission.upload_timeout + Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(30 * 60))
        .sqlx_logging(!config.is_production());

    Database::connect(opt).await
}

/// users / images テーブルが無ければ作成する
pub async fn run_migrations(db: &DbPool) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}
