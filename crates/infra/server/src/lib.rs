//! # NekoStats Server
//!
//! Standalone event aggregation server. Ingests raw page-view/event records
//! over HTTP and answers grouped, time-ranged analytical queries in the
//! `{labels, datasets}` shape the dashboard renders.

mod auth;
mod config;
mod routes;

pub use auth::{authorize, extract_bearer_token, principal_from_headers};
pub use config::{load_config, ConfigError, ServerConfig};
pub use routes::{stats_routes, AppState, StatsErrorResponse};

use nekostats_adapter_memory::MemoryEventStore;
use nekostats_core::auth::{AllowAll, Authorizer, SharedSecret};
use std::sync::Arc;

/// The event aggregation server.
pub struct StatsServer {
    /// Server configuration.
    pub config: ServerConfig,
}

impl StatsServer {
    /// Creates a new server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Builds the authorizer configured for this server.
    ///
    /// A configured `admin_secret` gates the API behind a bearer token;
    /// without one every caller is admitted.
    pub fn authorizer(&self) -> Arc<dyn Authorizer> {
        match self.config.admin_secret.as_deref() {
            Some(secret) => Arc::new(SharedSecret::new(secret)),
            None => Arc::new(AllowAll),
        }
    }

    /// Binds the listener and serves requests until shutdown.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let state = AppState {
            store: Arc::new(MemoryEventStore::new()),
            authorizer: self.authorizer(),
        };
        let app = stats_routes(state);

        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Starting NekoStats server on {addr}");

        axum::serve(listener, app).await?;
        Ok(())
    }
}

impl Default for StatsServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nekostats_core::auth::Principal;

    #[test]
    fn test_authorizer_from_config() {
        let open = StatsServer::default();
        assert!(open.authorizer().is_authorized(&Principal::anonymous()));

        let gated = StatsServer::new(ServerConfig {
            admin_secret: Some("s3cret".into()),
            ..ServerConfig::default()
        });
        assert!(!gated.authorizer().is_authorized(&Principal::anonymous()));
        assert!(
            gated
                .authorizer()
                .is_authorized(&Principal::with_token("s3cret"))
        );
    }
}
