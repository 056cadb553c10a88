use thiserror::Error;

const CODE_REQUIRED_MESSAGE: &str = "Code is required";
pub(crate) const EXCHANGE_FAILED_MESSAGE: &str = "Failed to exchange code for token";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authorization code is required")]
    MissingAuthorizationCode,

    #[error("invalid header: {name}={value}")]
    InvalidHeader { name: String, value: String },

    #[error("http status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("invalid response: {message}")]
    InvalidResponse { message: String, body: String },

    #[error("missing required configuration: {name}")]
    MissingConfig { name: &'static str },

    #[error("invalid configuration {name}={value}: {message}")]
    InvalidConfig {
        name: &'static str,
        value: String,
        message: String,
    },

    #[error("clipboard error: {message}")]
    Clipboard { message: String },

    #[error("browser error: {message}")]
    Browser { message: String },
}

impl RelayError {
    /// The message a caller of the relay endpoint sees for this error.
    ///
    /// Upstream detail stays in the server log; callers only learn whether
    /// their input was rejected or the exchange failed.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::MissingAuthorizationCode => CODE_REQUIRED_MESSAGE,
            _ => EXCHANGE_FAILED_MESSAGE,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::MissingAuthorizationCode)
    }

    /// JSON body returned by the relay endpoint for this error.
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.public_message() })
    }
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, axum::Json(self.to_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::RelayError;

    #[test]
    fn missing_code_maps_to_fixed_body() {
        let body = RelayError::MissingAuthorizationCode.to_body();
        assert_eq!(body, serde_json::json!({ "error": "Code is required" }));
    }

    #[test]
    fn upstream_failures_hide_detail() {
        let error = RelayError::HttpStatus {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(!error.is_client_error());
        assert_eq!(
            error.to_body(),
            serde_json::json!({ "error": "Failed to exchange code for token" })
        );
    }
}
