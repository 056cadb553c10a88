use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::RelayError;

/// Single-use code the provider appends to the redirect back to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    /// Rejects empty codes, which GitHub never issues.
    pub fn new(code: impl Into<String>) -> Result<Self, RelayError> {
        let code = code.into();
        if code.is_empty() {
            return Err(RelayError::MissingAuthorizationCode);
        }
        Ok(Self(code))
    }

    /// First `code` parameter of a query string; empty values count as absent.
    pub fn from_query(query: &str) -> Option<Self> {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "code")
            .and_then(|(_, value)| Self::new(value.into_owned()).ok())
    }

    pub fn from_url(url: &Url) -> Option<Self> {
        url.query().and_then(Self::from_query)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Access token as handed back by the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Body of `POST /api/github/token`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenExchangeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl TokenExchangeRequest {
    pub fn new(code: &AuthorizationCode) -> Self {
        Self {
            code: Some(code.as_str().to_string()),
        }
    }

    /// Lenient parse: anything that is not an object with a string `code`
    /// becomes a request without a code.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn into_code(self) -> Result<AuthorizationCode, RelayError> {
        self.code
            .ok_or(RelayError::MissingAuthorizationCode)
            .and_then(AuthorizationCode::new)
    }
}

/// Outcome the UI reads from a relay response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    Token(AccessToken),
    Rejected(Option<String>),
}

impl TokenOutcome {
    /// Interprets a relay body. `access_token` and `error` only count when
    /// they carry a real value: `null`, `false`, `0` and `""` are ignored.
    pub fn from_body(body: &Value) -> Self {
        if let Some(token) = body.get("access_token").filter(|value| is_truthy(value)) {
            return TokenOutcome::Token(AccessToken::new(value_text(token)));
        }

        let error = body
            .get("error")
            .filter(|value| is_truthy(value))
            .map(value_text);
        TokenOutcome::Rejected(error)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use url::Url;

    use super::{AccessToken, AuthorizationCode, TokenExchangeRequest, TokenOutcome};
    use crate::RelayError;

    #[test]
    fn code_from_query_params() {
        let url = Url::parse("http://localhost:5173/?code=abc123&state=ignored").unwrap();
        let code = AuthorizationCode::from_url(&url).unwrap();
        assert_eq!(code.as_str(), "abc123");
    }

    #[test]
    fn empty_or_missing_code_is_absent() {
        assert!(AuthorizationCode::from_query("code=").is_none());
        assert!(AuthorizationCode::from_query("state=x").is_none());
        let url = Url::parse("http://localhost:5173/").unwrap();
        assert!(AuthorizationCode::from_url(&url).is_none());
    }

    #[test]
    fn request_requires_non_empty_code() {
        let request = TokenExchangeRequest::from_body(br#"{"code":""}"#);
        assert!(matches!(
            request.into_code(),
            Err(RelayError::MissingAuthorizationCode)
        ));

        let request = TokenExchangeRequest::from_body(b"not json");
        assert!(request.code.is_none());

        let request = TokenExchangeRequest::from_body(br#"{"code":"abc"}"#);
        assert_eq!(request.into_code().unwrap().as_str(), "abc");
    }

    #[test]
    fn outcome_reads_token_or_error() {
        assert_eq!(
            TokenOutcome::from_body(&json!({ "access_token": "ghu_abc", "token_type": "bearer" })),
            TokenOutcome::Token(AccessToken::new("ghu_abc"))
        );
        assert_eq!(
            TokenOutcome::from_body(&json!({ "error": "bad_verification_code" })),
            TokenOutcome::Rejected(Some("bad_verification_code".to_string()))
        );
        assert_eq!(
            TokenOutcome::from_body(&json!({ "access_token": "", "error": "" })),
            TokenOutcome::Rejected(None)
        );
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("ghu_secret");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
    }
}
