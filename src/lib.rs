//! End-to-end harness: a real API server on an ephemeral port
//!
//! The root package only exists for the integration tests under `tests/`, which drive
//! the client crates against a live `worknest-api` server over TCP.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use worknest_activity_log::ActivityLogger;
use worknest_api::{ApiServer, AppState, ServerConfig, API_NAMESPACE};
use worknest_http::{shared_client, HttpClientTrait, HttpConfig};
use worknest_store::Database;

pub struct TestServer {
    /// API root including the namespace, e.g. `http://127.0.0.1:41234/api/v1`
    pub base_url: String,
    /// State shared with the running server
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<anyhow::Result<()>>>,
}

impl TestServer {
    pub async fn start() -> anyhow::Result<Self> {
        let state = AppState::new(Arc::new(Database::new()), Arc::new(ActivityLogger::new()));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (tx, rx) = oneshot::channel::<()>();
        let server = ApiServer::with_state(ServerConfig::default(), state.clone());
        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));

        tracing::debug!(%addr, "Test server started");
        Ok(Self {
            base_url: format!("http://{addr}{API_NAMESPACE}"),
            state,
            shutdown: Some(tx),
            handle: Some(handle),
        })
    }

    /// HTTP client pointed at this server
    pub fn http(&self) -> anyhow::Result<Arc<dyn HttpClientTrait>> {
        Ok(shared_client(self.http_config())?)
    }

    /// HTTP client whose requests are attributed to `actor`
    pub fn http_as(&self, actor: &str) -> anyhow::Result<Arc<dyn HttpClientTrait>> {
        Ok(shared_client(self.http_config().with_actor(actor))?)
    }

    fn http_config(&self) -> HttpConfig {
        HttpConfig::default().with_base_url(self.base_url.clone())
    }

    /// Stop accepting connections and wait for the server task
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await?,
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
