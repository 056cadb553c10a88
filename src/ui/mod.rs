mod browser;
mod render;
mod source;
mod state;

#[cfg(feature = "cli")]
pub use browser::DesktopBrowser;
pub use browser::{Browser, ScriptedBrowser};
pub use render::render_page;
pub use source::{RelayClient, TOKEN_PATH, TokenSource};
pub use state::{COPIED_LABEL, COPY_ACK_DURATION, COPY_LABEL, TokenPage, ViewState};
