use std::future::Future;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::{AuthorizationCode, RelayError, TokenExchangeRequest};

pub const TOKEN_PATH: &str = "/api/github/token";

/// Something the UI can hand an authorization code to and get a relay body
/// back from.
///
/// `Err` means the body never arrived (transport failure or a body that is
/// not JSON). Relay-level errors come back as `Ok` bodies with an `error`
/// field.
pub trait TokenSource: Send + Sync {
    fn exchange(
        &self,
        code: &AuthorizationCode,
    ) -> impl Future<Output = Result<Value, RelayError>> + Send;
}

/// Talks to a relay endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct RelayClient {
    endpoint: Url,
    http: Client,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> Result<Self, RelayError> {
        let http = Client::builder().build()?;
        Self::with_http_client(relay_url, http)
    }

    pub fn with_http_client(relay_url: &str, http: Client) -> Result<Self, RelayError> {
        let endpoint = Url::parse(relay_url)?.join(TOKEN_PATH)?;
        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl TokenSource for RelayClient {
    // Status codes are not inspected: 400 and 500 bodies carry the message.
    async fn exchange(&self, code: &AuthorizationCode) -> Result<Value, RelayError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&TokenExchangeRequest::new(code))
            .send()
            .await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| RelayError::InvalidResponse {
            message: err.to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RelayClient;

    #[test]
    fn endpoint_is_resolved_against_relay_url() {
        let client = RelayClient::new("http://localhost:3001").unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://localhost:3001/api/github/token"
        );
    }

    #[test]
    fn rejects_invalid_relay_url() {
        assert!(RelayClient::new("not a url").is_err());
    }
}
