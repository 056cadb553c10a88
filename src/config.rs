use std::fmt;

use crate::{GitHubProvider, OAuthProvider, RelayError};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3001";

/// Public client id baked in at build time, if `GITHUB_PUBLIC_CLIENT_ID` was
/// set when the crate was compiled.
pub const BUILD_CLIENT_ID: Option<&str> = option_env!("GITHUB_PUBLIC_CLIENT_ID");

const CLIENT_ID_VAR: &str = "GITHUB_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "GITHUB_CLIENT_SECRET";
const HOST_VAR: &str = "HOST";
const PORT_VAR: &str = "PORT";

/// Process-wide relay settings, read once at startup.
#[derive(Clone)]
pub struct RelayConfig {
    pub client_id: String,
    pub client_secret: String,
    pub host: String,
    pub port: u16,
}

impl RelayConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(RelayError::MissingConfig { name })
        };

        let mut config = Self::new(required(CLIENT_ID_VAR)?, required(CLIENT_SECRET_VAR)?);

        if let Some(host) = lookup(HOST_VAR).filter(|value| !value.is_empty()) {
            config = config.with_host(host);
        }

        if let Some(port) = lookup(PORT_VAR).filter(|value| !value.is_empty()) {
            let parsed = port
                .parse::<u16>()
                .map_err(|err| RelayError::InvalidConfig {
                    name: PORT_VAR,
                    value: port.clone(),
                    message: err.to_string(),
                })?;
            config = config.with_port(parsed);
        }

        Ok(config)
    }

    /// Like [`RelayConfig::from_lookup`], but explicit host/port values win
    /// over `HOST`/`PORT`, so an unusable `PORT` is never parsed when a port
    /// is given.
    pub fn from_lookup_with_overrides<F>(
        lookup: F,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|name| match name {
            HOST_VAR if host.is_some() => host.clone(),
            PORT_VAR if port.is_some() => port.map(|port| port.to_string()),
            _ => lookup(name),
        })
    }

    pub fn from_env_with_overrides(
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<Self, RelayError> {
        Self::from_lookup_with_overrides(|name| std::env::var(name).ok(), host, port)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// UI settings for the page served next to the relay. The relay's own
    /// client id is the public one.
    pub fn ui_config(&self) -> UiConfig {
        UiConfig::new(self.client_id.clone())
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Settings for the authorization UI. Nothing here is secret.
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub client_id: String,
    pub scope: String,
    pub relay_url: String,
    pub provider: GitHubProvider,
}

impl UiConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        let provider = GitHubProvider::new();
        Self {
            client_id: client_id.into(),
            scope: provider.default_scope().to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            provider,
        }
    }

    /// Uses the client id compiled into the binary.
    pub fn from_build_env() -> Result<Self, RelayError> {
        BUILD_CLIENT_ID
            .filter(|value| !value.is_empty())
            .map(Self::new)
            .ok_or(RelayError::MissingConfig {
                name: "GITHUB_PUBLIC_CLIENT_ID",
            })
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_relay_url(mut self, relay_url: impl Into<String>) -> Self {
        self.relay_url = relay_url.into();
        self
    }

    pub fn with_provider(mut self, provider: GitHubProvider) -> Self {
        self.provider = provider;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{RelayConfig, UiConfig};
    use crate::RelayError;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn requires_client_credentials() {
        let result = RelayConfig::from_lookup(lookup(&[("GITHUB_CLIENT_ID", "id")]));
        assert!(matches!(
            result,
            Err(RelayError::MissingConfig {
                name: "GITHUB_CLIENT_SECRET"
            })
        ));

        let result = RelayConfig::from_lookup(lookup(&[
            ("GITHUB_CLIENT_ID", ""),
            ("GITHUB_CLIENT_SECRET", "secret"),
        ]));
        assert!(matches!(
            result,
            Err(RelayError::MissingConfig {
                name: "GITHUB_CLIENT_ID"
            })
        ));
    }

    #[test]
    fn port_defaults_to_3001() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("GITHUB_CLIENT_ID", "id"),
            ("GITHUB_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn reads_port_and_host() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("GITHUB_CLIENT_ID", "id"),
            ("GITHUB_CLIENT_SECRET", "secret"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn rejects_invalid_port() {
        let result = RelayConfig::from_lookup(lookup(&[
            ("GITHUB_CLIENT_ID", "id"),
            ("GITHUB_CLIENT_SECRET", "secret"),
            ("PORT", "not-a-port"),
        ]));
        assert!(matches!(
            result,
            Err(RelayError::InvalidConfig { name: "PORT", .. })
        ));
    }

    #[test]
    fn explicit_port_skips_invalid_env_port() {
        let config = RelayConfig::from_lookup_with_overrides(
            lookup(&[
                ("GITHUB_CLIENT_ID", "id"),
                ("GITHUB_CLIENT_SECRET", "secret"),
                ("PORT", "not-a-port"),
                ("HOST", "0.0.0.0"),
            ]),
            Some("127.0.0.1".to_string()),
            Some(8080),
        )
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");

        let result = RelayConfig::from_lookup_with_overrides(
            lookup(&[
                ("GITHUB_CLIENT_ID", "id"),
                ("GITHUB_CLIENT_SECRET", "secret"),
                ("PORT", "not-a-port"),
            ]),
            None,
            None,
        );
        assert!(matches!(
            result,
            Err(RelayError::InvalidConfig { name: "PORT", .. })
        ));
    }

    #[test]
    fn debug_redacts_secret() {
        let config = RelayConfig::new("id", "super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn ui_config_defaults() {
        let config = UiConfig::new("public-id");
        assert_eq!(config.scope, "repo");
        assert_eq!(config.relay_url, "http://localhost:3001");
    }
}
