use std::time::Duration;

use tokio::time::Instant;
use url::Url;

use crate::{
    AccessToken, AuthorizationCode, Browser, RelayError, TokenOutcome, TokenSource, UiConfig,
    authorization_url,
};

pub const COPY_ACK_DURATION: Duration = Duration::from_millis(2000);
pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";

pub(crate) const FALLBACK_ERROR: &str = "Failed to get access token";
pub(crate) const TRANSPORT_ERROR: &str = crate::error::EXCHANGE_FAILED_MESSAGE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading { code: AuthorizationCode },
    Success { token: AccessToken },
    Failed { message: String },
}

impl ViewState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ViewState::Success { .. } | ViewState::Failed { .. })
    }

    /// Message shown to the user when the exchange failed.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            ViewState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// The token generator page.
///
/// Constructing it is the one-time initialization step: the location is read
/// once, and [`TokenPage::exchange`] only does work from `Loading`, so a code
/// is never sent twice for one page load.
#[derive(Debug)]
pub struct TokenPage {
    config: UiConfig,
    path: String,
    state: ViewState,
    copied_at: Option<Instant>,
}

impl TokenPage {
    pub fn initialize(config: UiConfig, location: &Url) -> Self {
        let state = match AuthorizationCode::from_url(location) {
            Some(code) => ViewState::Loading { code },
            None => ViewState::Idle,
        };

        Self {
            config,
            path: location.path().to_string(),
            state,
            copied_at: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn authorization_url(&self) -> Result<Url, RelayError> {
        authorization_url(
            &self.config.provider,
            &self.config.client_id,
            Some(&self.config.scope),
        )
    }

    /// Sends the code read at initialization and settles into `Success` or
    /// `Failed`. Returns whether an exchange was performed.
    pub async fn exchange<S, B>(&mut self, source: &S, browser: &mut B) -> bool
    where
        S: TokenSource,
        B: Browser,
    {
        let ViewState::Loading { code } = &self.state else {
            return false;
        };

        let next = match source.exchange(code).await {
            Ok(body) => match TokenOutcome::from_body(&body) {
                TokenOutcome::Token(token) => {
                    if let Err(err) = browser.replace_location(&self.path) {
                        tracing::warn!(error = %err, "failed to strip code from location");
                    }
                    ViewState::Success { token }
                }
                TokenOutcome::Rejected(error) => ViewState::Failed {
                    message: error.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
                },
            },
            Err(err) => {
                tracing::error!(error = %err, "token exchange error");
                ViewState::Failed {
                    message: TRANSPORT_ERROR.to_string(),
                }
            }
        };

        self.state = next;
        true
    }

    /// Sends the user to the provider. Only available while idle.
    pub fn login<B: Browser>(&self, browser: &mut B) -> Result<bool, RelayError> {
        if self.state != ViewState::Idle {
            return Ok(false);
        }
        let url = self.authorization_url()?;
        browser.navigate(&url)?;
        Ok(true)
    }

    /// Copies the token. Only available after a successful exchange.
    pub fn copy<B: Browser>(&mut self, browser: &mut B) -> Result<bool, RelayError> {
        let ViewState::Success { token } = &self.state else {
            return Ok(false);
        };
        browser.write_clipboard(token.as_str())?;
        self.copied_at = Some(Instant::now());
        Ok(true)
    }

    /// Label of the copy button; reverts on its own after
    /// [`COPY_ACK_DURATION`].
    pub fn copy_label(&self) -> &'static str {
        match self.copied_at {
            Some(at) if at.elapsed() < COPY_ACK_DURATION => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }
}
