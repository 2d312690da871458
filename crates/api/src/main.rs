use std::sync::Arc;

use anyhow::Context;

use careers_api::app::{self, services::AppServices};
use careers_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    careers_observability::init(config.log_format);

    if config.insecure_dev_secret {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let bind_addr = config.bind_addr.clone();
    let services = Arc::new(AppServices::connect(config).await?);
    services.bootstrap_admin().await?;

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
