//! GitHub OAuth token generator.
//!
//! A relay trades authorization codes for access tokens so the client secret
//! never reaches the browser, and a small page drives the flow: login,
//! exchange, show the token, copy it.

mod client;
mod config;
mod error;
mod providers;
#[cfg(feature = "server")]
mod relay;
mod types;
mod ui;

pub use client::{TokenExchangeClient, authorization_url};
pub use config::{BUILD_CLIENT_ID, DEFAULT_PORT, DEFAULT_RELAY_URL, RelayConfig, UiConfig};
pub use error::RelayError;
pub use providers::{GitHubProvider, OAuthProvider};
#[cfg(feature = "server")]
pub use relay::RelayServer;
pub use types::{AccessToken, AuthorizationCode, TokenExchangeRequest, TokenOutcome};
#[cfg(feature = "cli")]
pub use ui::DesktopBrowser;
pub use ui::{
    Browser, COPIED_LABEL, COPY_ACK_DURATION, COPY_LABEL, RelayClient, ScriptedBrowser,
    TOKEN_PATH, TokenPage, TokenSource, ViewState, render_page,
};
