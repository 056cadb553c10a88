use clap::{Parser, Subcommand};
use gh_token_gen::{
    BUILD_CLIENT_ID, COPIED_LABEL, DEFAULT_RELAY_URL, DesktopBrowser, RelayClient, RelayConfig,
    RelayError, RelayServer, TokenPage, UiConfig, ViewState,
};
use url::Url;

#[derive(Debug, Parser)]
#[command(
    name = "gh-token-gen",
    about = "Generate GitHub OAuth access tokens without exposing the client secret."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the token relay and the token generator page.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Open the GitHub authorize page in the system browser.
    Login {
        #[arg(long, env = "GITHUB_CLIENT_ID")]
        client_id: Option<String>,
        #[arg(long)]
        scope: Option<String>,
    },
    /// Exchange a code (or the URL GitHub redirected to) through a relay.
    Redeem {
        code_or_url: String,
        #[arg(long, env = "TOKEN_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
        relay_url: String,
        /// Print the token without copying it to the clipboard.
        #[arg(long)]
        no_copy: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve { host, port } => run_serve(host, port).await,
        Command::Login { client_id, scope } => run_login(client_id, scope),
        Command::Redeem {
            code_or_url,
            relay_url,
            no_copy,
        } => run_redeem(&code_or_url, relay_url, no_copy).await,
    };

    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

async fn run_serve(host: Option<String>, port: Option<u16>) -> Result<(), RelayError> {
    let config = RelayConfig::from_env_with_overrides(host, port)?;
    tracing::debug!(?config, "loaded relay configuration");

    RelayServer::new(config)?.run().await
}

fn run_login(client_id: Option<String>, scope: Option<String>) -> Result<(), RelayError> {
    let mut config = match client_id.filter(|id| !id.is_empty()) {
        Some(client_id) => UiConfig::new(client_id),
        None => UiConfig::from_build_env()?,
    };
    if let Some(scope) = scope {
        config = config.with_scope(scope);
    }

    let location = Url::parse(&config.relay_url)?;
    let page = TokenPage::initialize(config, &location);
    eprintln!("Authorization URL:\n{}", page.authorization_url()?);
    if let Err(err) = page.login(&mut DesktopBrowser) {
        eprintln!("Failed to open browser automatically: {err}");
    }
    Ok(())
}

async fn run_redeem(code_or_url: &str, relay_url: String, no_copy: bool) -> Result<(), RelayError> {
    let location = callback_location(code_or_url)?;
    let config = UiConfig::new(BUILD_CLIENT_ID.unwrap_or_default()).with_relay_url(relay_url);
    let relay = RelayClient::new(&config.relay_url)?;

    let mut page = TokenPage::initialize(config, &location);
    let mut browser = DesktopBrowser;
    page.exchange(&relay, &mut browser).await;

    match page.state() {
        ViewState::Success { token } => {
            println!("{}", token.as_str());
            if !no_copy {
                match page.copy(&mut browser) {
                    Ok(_) => eprintln!("{COPIED_LABEL}"),
                    Err(err) => eprintln!("Failed to copy token: {err}"),
                }
            }
            Ok(())
        }
        failed @ ViewState::Failed { .. } => {
            eprintln!("{}", failed.failure_message().unwrap_or_default());
            std::process::exit(1);
        }
        ViewState::Idle | ViewState::Loading { .. } => Err(RelayError::MissingAuthorizationCode),
    }
}

/// Accepts either the full redirect URL or a bare code.
fn callback_location(code_or_url: &str) -> Result<Url, RelayError> {
    if let Ok(url) = Url::parse(code_or_url) {
        return Ok(url);
    }
    let mut url = Url::parse(DEFAULT_RELAY_URL)?;
    url.query_pairs_mut().append_pair("code", code_or_url);
    Ok(url)
}
