//! Admin web server: a thin axum layer over the reconciliation core.

pub mod handlers;
pub mod routes;
pub mod types;

use std::sync::Arc;

use tower_http::cors::CorsLayer;

use crate::web::types::AppState;
use crate::Reconciler;

/// Web server settings.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 7080,
        }
    }
}

/// Admin API server.
pub struct WebServer {
    config: WebConfig,
    reconciler: Arc<Reconciler>,
}

impl WebServer {
    pub fn new(config: WebConfig, reconciler: Reconciler) -> Self {
        Self {
            config,
            reconciler: Arc::new(reconciler),
        }
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(&self) -> std::io::Result<()> {
        let state = Arc::new(AppState {
            reconciler: Arc::clone(&self.reconciler),
        });

        let app = routes::create_routes()
            .layer(CorsLayer::permissive())
            .with_state(state);

        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(%addr, "admin API listening");

        axum::serve(listener, app).await?;
        Ok(())
    }
}
