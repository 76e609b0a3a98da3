use std::sync::Arc;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use user_api::routes::{create_app, HttpSettings};
use user_api::shared::clients::CloudinaryClient;
use user_api::shared::config::AppConfig;
use user_api::shared::database::{Database, UserRepository};
use user_api::shared::services::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 로깅 초기화 (RUST_LOG 로 조정)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    // 설정 로드 (.env 포함)
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // DB 연결
    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    db.migrate().await?;

    // 협력자 생성 후 AppState 에 주입
    let user_store = Arc::new(UserRepository::new(db.pool().clone()));
    let media_store = Arc::new(CloudinaryClient::new(config.cloudinary.clone())?);

    let app_state = AppState::new(
        &config.jwt,
        config.upload_temp_dir.clone(),
        user_store,
        media_store,
    );

    let settings = HttpSettings {
        cors_origin: Some(
            config
                .cors_origin
                .parse()
                .with_context(|| format!("Invalid CORS_ORIGIN: {}", config.cors_origin))?,
        ),
        max_upload_bytes: config.max_upload_bytes,
    };
    let app = create_app(app_state, settings);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on http://localhost:{}", config.port);
    tracing::info!("Swagger UI available at http://localhost:{}/api", config.port);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
