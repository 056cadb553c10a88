use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::Value;
use url::Url;

use crate::{
    GitHubProvider, RelayError, ScriptedBrowser, TokenExchangeClient, TokenExchangeRequest,
    TokenPage, UiConfig, render_page,
};

#[derive(Clone)]
pub(super) struct RelayState {
    pub(super) client: Arc<TokenExchangeClient<GitHubProvider>>,
    pub(super) ui: UiConfig,
}

/// `POST /api/github/token`
pub(super) async fn token_handler(
    State(state): State<RelayState>,
    body: Bytes,
) -> Result<Json<Value>, RelayError> {
    let request = TokenExchangeRequest::from_body(&body);
    let response = state.client.relay(request).await?;
    Ok(Json(response))
}

/// `GET /`: the token generator page, with any code in the query exchanged
/// in-process before rendering. The browser waits on this request while the
/// exchange runs.
pub(super) async fn page_handler(
    State(state): State<RelayState>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let location = match page_location(&uri.to_string()) {
        Ok(location) => location,
        Err(err) => return render_error(err),
    };

    let mut page = TokenPage::initialize(state.ui.clone(), &location);
    let mut browser = ScriptedBrowser::new();
    page.exchange(state.client.as_ref(), &mut browser).await;

    match render_page(&page, &browser) {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(err) => render_error(err),
    }
}

pub(super) async fn fallback_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

// Only path and query matter to the page; the origin is a placeholder.
fn page_location(path_and_query: &str) -> Result<Url, RelayError> {
    Url::parse("http://localhost/")?
        .join(path_and_query)
        .map_err(RelayError::from)
}

fn render_error(err: RelayError) -> Response {
    tracing::error!(error = %err, "failed to render token page");
    err.into_response()
}
