// src/main.rs
use gallery_backend::api::{app_router, AppState};
use gallery_backend::config::AppConfig;
use gallery_backend::db::{create_db_pool, run_migrations};
use gallery_backend::service::storage_service::create_storage_service;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env は設定読み込みより前に反映させる（RUST_LOG を含むため）
    dotenvy::dotenv().ok();

    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Gallery Backend server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        storage = ?app_config.storage.provider(),
        max_images = app_config.submission.max_images,
        upload_timeout_secs = app_config.submission.upload_timeout.as_secs(),
        "Configuration loaded"
    );

    // データベース接続を作成し、テーブルが無ければ作成する
    let db_pool = create_db_pool(&app_config).await?;
    run_migrations(&db_pool).await?;
    tracing::info!("Database pool created and tables initialized.");

    let storage = create_storage_service(&app_config.storage);
    let app_state = AppState::new(db_pool, storage, &app_config);
    let app_router = app_router(app_state);

    // サーバーの起動
    let listener = TcpListener::bind(app_config.server_addr()).await?;
    tracing::info!("Server listening on {}", app_config.server_addr());
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
