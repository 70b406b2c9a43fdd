//! Verdict service entrypoint: load config and model once, then serve until signalled.

use anyhow::Context;
use tracing::info;
use verdict_service::{
    api::{self, AppState},
    config::ServiceConfig,
    logging::StructuredLogger,
    model::ModelHandle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = ServiceConfig::path_from_env();
    let config = ServiceConfig::load(&config_path);

    StructuredLogger::init(&config.log);

    info!(config = %config_path.display(), model_path = %config.model_path.display(), "verdict service starting");

    let model = ModelHandle::load(&config.model_path);
    let model_loaded = model.is_loaded();
    let state = AppState::new(model);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, model_loaded, "listening");

    api::serve(listener, state, api::shutdown_signal()).await?;
    info!("verdict service stopped");
    Ok(())
}
