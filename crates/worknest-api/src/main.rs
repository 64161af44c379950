//! Worknest API server binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use worknest_api::{ApiServer, ServerConfig};

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = ServerConfig::default_path();
    let config = ServerConfig::load(path.as_deref())?;
    init_tracing(&config);

    tracing::info!(
        bind_addr = %config.bind_addr,
        config_path = ?path,
        seed_demo = config.seed_demo,
        "Starting Worknest API"
    );

    ApiServer::new(config).await?.run().await
}
