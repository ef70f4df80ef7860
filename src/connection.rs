//! Per-connection client cache
//!
//! Queries share one [`VantaClient`] per connection. The first caller builds
//! it (fetching an OAuth token when configured); concurrent callers wait on
//! the same mutex and reuse the result.

use crate::api::VantaClient;
use crate::config::ConnectionConfig;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Lazily created, shared API client for one connection
#[derive(Debug)]
pub struct ConnectionManager {
    config: ConnectionConfig,
    client: Mutex<Option<Arc<VantaClient>>>,
}

impl ConnectionManager {
    /// Create a manager; no network traffic happens until [`client`](Self::client)
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            client: Mutex::new(None),
        }
    }

    /// The connection config
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Get the cached client, creating it on first use
    pub async fn client(&self) -> Result<Arc<VantaClient>> {
        let mut guard = self.client.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(Arc::clone(client));
        }

        debug!("creating Vanta client");
        let client = Arc::new(VantaClient::connect(&self.config).await?);
        *guard = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Drop the cached client so the next call reconnects
    pub async fn reset(&self) {
        *self.client.lock().await = None;
    }
}
