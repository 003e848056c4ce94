//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration and compile the sitemap before anything is bound
//! - Initialize metrics when enabled
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};

use crate::config::{validate_config, ConfigError, ServerConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;
use crate::routing::SitemapRouter;
use crate::sitemap::{Sitemap, SitemapError};

/// Errors that prevent the server from starting or running.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid sitemap: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("server task failed: {0}")]
    Join(#[from] JoinError),
}

/// A server accepting connections in a background task.
pub struct RunningServer {
    pub local_addr: SocketAddr,
    pub handle: JoinHandle<Result<(), io::Error>>,
}

/// Compile `sitemap`, bind, and spawn the server. It stops when `shutdown`
/// is triggered.
pub async fn start(
    sitemap: Sitemap,
    config: ServerConfig,
    shutdown: &Shutdown,
) -> Result<RunningServer, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    let router = SitemapRouter::new(sitemap, &config.router)?;
    metrics::record_route_count(router.routes().len());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config, Arc::new(router));
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Ok(RunningServer { local_addr, handle })
}

/// Serve `sitemap` until SIGINT or SIGTERM.
pub async fn serve(sitemap: Sitemap, config: ServerConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let running = start(sitemap, config, &shutdown).await?;
    running.handle.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::Resource;
    use serde_json::Value;

    fn local_config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config
    }

    #[tokio::test]
    async fn test_invalid_sitemap_fails_before_binding() {
        let sitemap = Sitemap::new().route("{bad", Resource::new(|_, _| Ok(Value::Null)));
        let result = start(sitemap, local_config(), &Shutdown::new()).await;
        assert!(matches!(result, Err(StartupError::Sitemap(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut config = local_config();
        config.listener.max_connections = 0;
        let sitemap = Sitemap::new().index(Resource::new(|_, _| Ok(Value::Null)));
        let result = start(sitemap, config, &Shutdown::new()).await;
        assert!(matches!(result, Err(StartupError::Config(_))));
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let shutdown = Shutdown::new();
        let sitemap = Sitemap::new().index(Resource::new(|_, _| Ok(Value::Null)));

        let running = start(sitemap, local_config(), &shutdown).await.unwrap();
        assert_ne!(running.local_addr.port(), 0);

        shutdown.trigger();
        assert!(running.handle.await.unwrap().is_ok());
    }
}
