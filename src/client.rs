use std::collections::HashMap;
use std::fmt;

use reqwest::{
    Client, RequestBuilder,
    header::{HeaderName, HeaderValue},
};
use serde_json::Value;
use url::Url;

use crate::{
    AuthorizationCode, OAuthProvider, RelayConfig, RelayError, TokenExchangeRequest, TokenSource,
};

/// Authorize URL the login action navigates to.
pub fn authorization_url<P: OAuthProvider>(
    provider: &P,
    client_id: &str,
    scope: Option<&str>,
) -> Result<Url, RelayError> {
    let scope = scope.unwrap_or(provider.default_scope());
    let mut url = Url::parse(provider.authorize_url())?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("scope", scope);
    Ok(url)
}

/// Server-side half of the flow: holds the client secret and trades
/// authorization codes for tokens at the provider.
#[derive(Clone)]
pub struct TokenExchangeClient<P: OAuthProvider> {
    provider: P,
    client_id: String,
    client_secret: String,
    http: Client,
}

impl<P: OAuthProvider> TokenExchangeClient<P> {
    pub fn new(provider: P, config: &RelayConfig) -> Result<Self, RelayError> {
        let http = Client::builder().build()?;
        Ok(Self::with_http_client(provider, config, http))
    }

    pub fn with_http_client(provider: P, config: &RelayConfig, http: Client) -> Self {
        Self {
            provider,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            http,
        }
    }

    pub fn authorization_url(&self) -> Result<Url, RelayError> {
        authorization_url(&self.provider, &self.client_id, None)
    }

    /// Validates an incoming relay request and forwards its code.
    ///
    /// Whatever the provider answers with a success status comes back
    /// untouched, including its own `error` payloads.
    pub async fn relay(&self, request: TokenExchangeRequest) -> Result<Value, RelayError> {
        let code = request.into_code().inspect_err(|_| {
            tracing::warn!("rejected token exchange request without a code");
        })?;

        self.exchange_code(&code).await.inspect_err(|err| {
            tracing::error!(
                provider = self.provider.id(),
                error = %err,
                "token exchange error"
            );
        })
    }

    /// One POST to the provider's token endpoint. No retries.
    pub async fn exchange_code(&self, code: &AuthorizationCode) -> Result<Value, RelayError> {
        let mut payload = HashMap::new();
        payload.insert("client_id".to_string(), self.client_id.clone());
        payload.insert("client_secret".to_string(), self.client_secret.clone());
        payload.insert("code".to_string(), code.as_str().to_string());

        tracing::debug!(
            provider = self.provider.id(),
            token_url = self.provider.token_url(),
            "exchanging authorization code"
        );

        let headers = self.provider.token_headers();
        let mut builder = self.http.post(self.provider.token_url());
        builder = apply_headers(builder, &headers)?;

        let response = builder.json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RelayError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        // Non-JSON answers are relayed as a JSON string.
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

impl<P: OAuthProvider + fmt::Debug> fmt::Debug for TokenExchangeClient<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenExchangeClient")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish_non_exhaustive()
    }
}

impl<P: OAuthProvider> TokenSource for TokenExchangeClient<P> {
    /// In-process relay: the caller sees exactly the body the HTTP endpoint
    /// would have returned.
    async fn exchange(&self, code: &AuthorizationCode) -> Result<Value, RelayError> {
        let request = TokenExchangeRequest::new(code);
        match self.relay(request).await {
            Ok(body) => Ok(body),
            Err(err) => Ok(err.to_body()),
        }
    }
}

fn apply_headers(
    mut builder: RequestBuilder,
    headers: &[(String, String)],
) -> Result<RequestBuilder, RelayError> {
    for (name, value) in headers {
        let name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| RelayError::InvalidHeader {
                name: name.clone(),
                value: value.clone(),
            })?;
        let value = HeaderValue::from_str(value).map_err(|_| RelayError::InvalidHeader {
            name: name.to_string(),
            value: value.clone(),
        })?;
        builder = builder.header(name, value);
    }
    Ok(builder)
}
