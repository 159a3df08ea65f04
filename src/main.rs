//! CLI entry point for the cookie-auth tool.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cookie_auth::client::DEFAULT_API_BASE_URL;
use cookie_auth::gateway::ENVIRONMENT_VAR;
use cookie_auth::{
    ApiResult, AuthClient, ClientConfig, CookieAttributes, CookieGateway, HttpCookieGateway,
    MemoryCookieGateway, TokenCookies, User,
};
use tracing::{debug, info};

mod app_config;
mod cli;

use app_config::{FileConfig, load_config};
use cli::{Cli, Command};

/// Origin of the Next.js dev server that hosts `/api/cookies`.
const DEFAULT_GATEWAY_URL: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();
    let loaded = load_config(cli.config.as_deref())?;
    let file_config = loaded.config;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > default (info)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => file_config
                .verbosity
                .map_or("info", app_config::VerbositySetting::log_level),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(
        config_path = ?loaded.path,
        from_file = loaded.loaded_from_file,
        "Configuration resolved"
    );

    let client = build_client(&cli, &file_config)?;
    debug!(
        api_url = %client.config().api_base_url,
        timeout = ?client.config().timeout,
        "API client ready"
    );
    let ok = run_command(&client, &cli.command).await?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn build_client(cli: &Cli, file_config: &FileConfig) -> Result<AuthClient> {
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| file_config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let mut config = ClientConfig::new(api_url);
    if let Some(timeout_secs) = cli.timeout_secs.or(file_config.timeout_secs) {
        config = config.with_timeout(Duration::from_secs(timeout_secs));
    }

    let gateway: Arc<dyn CookieGateway> = if cli.in_memory {
        let attributes = match file_config.production {
            Some(production) => CookieAttributes::for_environment(production),
            None => CookieAttributes::from_env(),
        };
        debug!(
            secure = attributes.secure,
            env_var = ENVIRONMENT_VAR,
            "Using in-memory cookie store"
        );
        Arc::new(MemoryCookieGateway::with_attributes(attributes))
    } else {
        let gateway_url = cli
            .gateway_url
            .clone()
            .or_else(|| file_config.gateway_url.clone())
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());
        debug!(%gateway_url, "Using HTTP cookie gateway");
        Arc::new(
            HttpCookieGateway::new(&gateway_url)
                .with_context(|| format!("Invalid cookie gateway URL '{gateway_url}'"))?,
        )
    };

    AuthClient::new(config, TokenCookies::new(gateway)).context("Failed to build API client")
}

async fn run_command(client: &AuthClient, command: &Command) -> Result<bool> {
    match command {
        Command::Login {
            username,
            password,
            fetch_me,
        } => {
            let login = client.login(username, password).await;
            if !report(login)? {
                return Ok(false);
            }
            info!("Logged in; tokens stored as cookies");
            if *fetch_me {
                return report(client.current_user().await);
            }
            Ok(true)
        }
        Command::Me => report(client.current_user().await),
        Command::User { id } => report(client.user_by_id(*id).await),
        Command::DummyUser => report(client.random_dummy_user().await),
    }
}

/// Prints the data as JSON on stdout, or the error on stderr.
fn report(result: ApiResult<User>) -> Result<bool> {
    match result {
        ApiResult::Success { data } => {
            let json = serde_json::to_string_pretty(&data).context("Failed to render user")?;
            println!("{json}");
            Ok(true)
        }
        ApiResult::Error { error } => {
            eprintln!("Error: {error}");
            Ok(false)
        }
    }
}
