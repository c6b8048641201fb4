use std::sync::Arc;

use anyhow::Context;
use stockroom_api::{app, config::ServerConfig};
use stockroom_infra::FlatFileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = ServerConfig::from_env();
    tracing::info!(?config, "starting stockroom api");

    let store = Arc::new(FlatFileStore::new(&config.db_path));
    let services = app::services::AppServices::bootstrap(store, config.activity_capacity)
        .context("failed to load catalog")?;
    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
