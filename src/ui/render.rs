use crate::{RelayError, ScriptedBrowser, TokenPage, ViewState};

use super::state::{COPIED_LABEL, COPY_ACK_DURATION, COPY_LABEL};

const PAGE_TEMPLATE: &str = include_str!("html/page.html");

const INTRO: &str = "Generate a GitHub access token for your application by authenticating with your GitHub account.";

/// Renders the page for its current state. Effects collected in `browser`
/// run as inline script once the page loads.
pub fn render_page(page: &TokenPage, browser: &ScriptedBrowser) -> Result<String, RelayError> {
    let body = match page.state() {
        ViewState::Idle => {
            let url = page.authorization_url()?;
            format!(
                r#"      <p class="intro">{INTRO}</p>
      <a id="login" class="button" href="{}">Login with GitHub</a>"#,
                escape_html(url.as_str())
            )
        }
        ViewState::Loading { .. } => {
            r#"      <p class="intro">Authenticating with GitHub...</p>"#.to_string()
        }
        ViewState::Success { token } => format!(
            r#"      <p class="success">&#10003; Successfully generated token</p>
      <div class="token">
        <textarea id="token" readonly>{}</textarea>
        <button id="copy" type="button">{}</button>
      </div>
      <div class="tips">
        <p>Make sure to:</p>
        <ul>
          <li>Save this token securely - it won't be shown again</li>
          <li>Keep it private and don't share it</li>
          <li>Use it in your application's environment variables</li>
        </ul>
      </div>"#,
            escape_html(token.as_str()),
            page.copy_label()
        ),
        ViewState::Failed { message } => format!(
            r#"      <div id="error" class="error"><p>{}</p></div>
      <a class="button" href="/">Start over</a>"#,
            escape_html(message)
        ),
    };

    Ok(PAGE_TEMPLATE
        .replace("{{copied_label}}", COPIED_LABEL)
        .replace("{{copy_label}}", COPY_LABEL)
        .replace(
            "{{copy_ack_ms}}",
            &COPY_ACK_DURATION.as_millis().to_string(),
        )
        .replace("{{script}}", &browser.script())
        .replace("{{body}}", &body))
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{escape_html, render_page};
    use crate::{Browser, ScriptedBrowser, TokenPage, UiConfig};

    fn page(location: &str) -> TokenPage {
        TokenPage::initialize(UiConfig::new("public-id"), &Url::parse(location).unwrap())
    }

    #[test]
    fn idle_page_links_to_authorize_url() {
        let html = render_page(&page("http://localhost:3001/"), &ScriptedBrowser::new()).unwrap();
        assert!(html.contains(
            r#"href="https://github.com/login/oauth/authorize?client_id=public-id&amp;scope=repo""#
        ));
        assert!(html.contains("Login with GitHub"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn loading_page_has_no_login() {
        let html = render_page(
            &page("http://localhost:3001/?code=abc"),
            &ScriptedBrowser::new(),
        )
        .unwrap();
        assert!(html.contains("Authenticating with GitHub..."));
        assert!(!html.contains("Login with GitHub"));
    }

    #[test]
    fn includes_collected_script() {
        let mut browser = ScriptedBrowser::new();
        browser.replace_location("/").unwrap();
        let html = render_page(&page("http://localhost:3001/"), &browser).unwrap();
        assert!(html.contains(r#"window.history.replaceState({}, document.title, "/");"#));
        assert!(html.contains("}, 2000);"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b a="1">&'"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#39;"
        );
    }
}
