//! API server

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use worknest_activity_log::ActivityLogger;
use worknest_store::Database;

use crate::{config::ServerConfig, routes, state::AppState};

/// Owns the state and serves the router
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Build the store and activity log, seeding demo data when configured
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let db = Arc::new(Database::new());
        if config.seed_demo {
            db.seed_demo().await?;
        }
        let activity_logger = Arc::new(ActivityLogger::with_capacity(config.activity_log_capacity));

        Ok(Self {
            state: AppState::new(db, activity_logger),
            config,
        })
    }

    /// Serve around existing state, e.g. a store shared with tests
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        info!("Worknest API listening on http://{}", addr);

        let app = routes::app(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Worknest API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
