mod github;
mod provider;

pub use github::GitHubProvider;
pub use provider::OAuthProvider;
