use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::{GitHubProvider, RelayConfig, RelayError, TOKEN_PATH, TokenExchangeClient, UiConfig};

use super::http::{RelayState, fallback_handler, page_handler, token_handler};

/// HTTP front of the relay: the token endpoint plus the page that uses it.
#[derive(Clone)]
pub struct RelayServer {
    config: RelayConfig,
    state: RelayState,
}

impl RelayServer {
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = TokenExchangeClient::new(GitHubProvider::new(), &config)?;
        Ok(Self::with_client(config, client))
    }

    /// Uses a prepared exchange client, e.g. one pointed at another token
    /// endpoint.
    pub fn with_client(config: RelayConfig, client: TokenExchangeClient<GitHubProvider>) -> Self {
        let ui = config.ui_config();
        Self {
            state: RelayState {
                client: Arc::new(client),
                ui,
            },
            config,
        }
    }

    pub fn with_ui_config(mut self, ui: UiConfig) -> Self {
        self.state.ui = ui;
        self
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(page_handler))
            .route(TOKEN_PATH, post(token_handler))
            .fallback(fallback_handler)
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    pub async fn bind(&self) -> Result<TcpListener, RelayError> {
        TcpListener::bind(self.config.bind_addr())
            .await
            .map_err(RelayError::from)
    }

    pub async fn serve_with(&self, listener: TcpListener) -> Result<(), RelayError> {
        let addr = listener.local_addr()?;
        tracing::info!("Server running on http://localhost:{}", addr.port());
        tracing::info!("  GET  /");
        tracing::info!("  POST {}", TOKEN_PATH);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    pub async fn run(&self) -> Result<(), RelayError> {
        let listener = self.bind().await?;
        self.serve_with(listener).await
    }
}
