use std::time::Duration;

use clap::Parser;
use eyre::Result;
use log::info;

mod cli;

use cli::Cli;

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    // Load config file (non-fatal if missing/invalid); CLI flags take priority
    let config = ytsum::config::Config::load().unwrap_or_default();
    let host = cli.host.unwrap_or(config.host);
    let port = cli.port.unwrap_or(config.port);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let state = ytsum::server::AppState::new(client);
    let app = ytsum::server::app(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
