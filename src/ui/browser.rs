use url::Url;

use crate::RelayError;

/// Side effects the authorization page has on its surroundings.
pub trait Browser {
    /// Leaves the page for `url`.
    fn navigate(&mut self, url: &Url) -> Result<(), RelayError>;

    /// Rewrites the visible location without reloading.
    fn replace_location(&mut self, path: &str) -> Result<(), RelayError>;

    fn write_clipboard(&mut self, text: &str) -> Result<(), RelayError>;
}

/// Collects effects as inline script for a server-rendered page.
///
/// Clipboard writes are left to the page's own copy button, which needs a
/// user gesture.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBrowser {
    statements: Vec<String>,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self) -> String {
        self.statements.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Browser for ScriptedBrowser {
    fn navigate(&mut self, url: &Url) -> Result<(), RelayError> {
        self.statements
            .push(format!("window.location.href = {};", js_string(url.as_str())));
        Ok(())
    }

    fn replace_location(&mut self, path: &str) -> Result<(), RelayError> {
        self.statements.push(format!(
            "window.history.replaceState({{}}, document.title, {});",
            js_string(path)
        ));
        Ok(())
    }

    fn write_clipboard(&mut self, _text: &str) -> Result<(), RelayError> {
        Err(RelayError::Clipboard {
            message: "clipboard writes need a user gesture in the page".to_string(),
        })
    }
}

/// JSON string literal that is also safe inside a `<script>` element.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}

/// The user's desktop: system browser and system clipboard.
#[cfg(feature = "cli")]
#[derive(Debug, Default)]
pub struct DesktopBrowser;

#[cfg(feature = "cli")]
impl Browser for DesktopBrowser {
    fn navigate(&mut self, url: &Url) -> Result<(), RelayError> {
        webbrowser::open(url.as_str()).map_err(|err| RelayError::Browser {
            message: err.to_string(),
        })
    }

    // A terminal has no location bar.
    fn replace_location(&mut self, _path: &str) -> Result<(), RelayError> {
        Ok(())
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), RelayError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|err| RelayError::Clipboard {
            message: err.to_string(),
        })?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| RelayError::Clipboard {
                message: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{Browser, ScriptedBrowser};

    #[test]
    fn scripts_location_rewrite() {
        let mut browser = ScriptedBrowser::new();
        assert!(browser.is_empty());
        browser.replace_location("/").unwrap();
        assert_eq!(
            browser.script(),
            r#"window.history.replaceState({}, document.title, "/");"#
        );
    }

    #[test]
    fn script_strings_cannot_close_the_script_tag() {
        let mut browser = ScriptedBrowser::new();
        browser.replace_location("/</script><b>").unwrap();
        assert!(!browser.script().contains("</script>"));

        let url = Url::parse("https://github.com/login/oauth/authorize?client_id=x").unwrap();
        browser.navigate(&url).unwrap();
        assert!(browser.script().ends_with(
            r#"window.location.href = "https://github.com/login/oauth/authorize?client_id=x";"#
        ));
    }
}
