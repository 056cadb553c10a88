use crate::OAuthProvider;

// References:
// - https://docs.github.com/en/apps/oauth-apps/building-oauth-apps/authorizing-oauth-apps#web-application-flow

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

const DEFAULT_SCOPE: &str = "repo";

#[derive(Debug, Clone)]
pub struct GitHubProvider {
    authorize_url: String,
    token_url: String,
}

impl Default for GitHubProvider {
    fn default() -> Self {
        Self {
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }
}

impl OAuthProvider for GitHubProvider {
    fn id(&self) -> &'static str {
        "github"
    }

    fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    fn token_url(&self) -> &str {
        &self.token_url
    }

    fn default_scope(&self) -> &'static str {
        DEFAULT_SCOPE
    }

    // GitHub answers form-encoded unless asked otherwise.
    fn token_headers(&self) -> Vec<(String, String)> {
        vec![("Accept".to_string(), "application/json".to_string())]
    }
}

impl GitHubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points token exchanges at another endpoint, e.g. GitHub Enterprise or
    /// a local mock.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_authorize_url(mut self, authorize_url: impl Into<String>) -> Self {
        self.authorize_url = authorize_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::GitHubProvider;
    use crate::OAuthProvider;

    #[test]
    fn defaults_to_public_github_endpoints() {
        let provider = GitHubProvider::new();
        assert_eq!(provider.id(), "github");
        assert_eq!(
            provider.authorize_url(),
            "https://github.com/login/oauth/authorize"
        );
        assert_eq!(
            provider.token_url(),
            "https://github.com/login/oauth/access_token"
        );
        assert_eq!(provider.default_scope(), "repo");
    }

    #[test]
    fn token_url_can_be_overridden() {
        let provider = GitHubProvider::new().with_token_url("http://127.0.0.1:9999/token");
        assert_eq!(provider.token_url(), "http://127.0.0.1:9999/token");
        assert_eq!(
            provider.token_headers(),
            vec![("Accept".to_string(), "application/json".to_string())]
        );
    }
}
