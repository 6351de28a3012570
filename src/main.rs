use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mini_studio::{
    config::AppConfig,
    gemini::GeminiImageGenerator,
    mcp_server::StudioServer,
    storage::LocalFileStorage,
    studio::Studio,
    web_routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    let bind_address = config.bind_address();
    let mcp_path = config.mcp_path();

    let storage = Arc::new(LocalFileStorage::new(config.data_dir.clone()));
    let generator = Arc::new(GeminiImageGenerator::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.timeout,
    )?);
    let studio = Arc::new(Studio::open(storage, generator).await);

    let studio_for_service = studio.clone();
    let service = StreamableHttpService::new(
        move || Ok(StudioServer::new(studio_for_service.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new()
        .route(&config.images_path(), get(web_routes::download_image))
        .nest_service(&mcp_path, service)
        .with_state(studio);
    let tcp_listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!(
        data_dir = %config.data_dir.display(),
        "studio MCP server listening at http://{}{}",
        bind_address,
        mcp_path
    );

    let _ = axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async { let _ = tokio::signal::ctrl_c().await; })
        .await;
    Ok(())
}
