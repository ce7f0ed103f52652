// src/main.rs — docquery entry point

use clap::Parser;
use std::sync::Arc;

use docquery::cli::ask::{run_ask, AskOptions};
use docquery::cli::session::{run_session, SessionOptions};
use docquery::cli::status::show_providers;
use docquery::cli::{Cli, Commands};
use docquery::gateway::{BackendGateway, HttpGateway};
use docquery::infra::config::{Config, API_URL_ENV};
use docquery::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects DOCQUERY_LOG / RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        let mut config = Config::load_from(std::path::Path::new(path))?;
        config.apply_api_url(std::env::var(API_URL_ENV).ok());
        config
    } else {
        Config::load()?
    };
    config.apply_api_url(cli.api_url.clone());

    if let Some(Commands::Providers) = cli.command {
        show_providers(&config);
        return Ok(());
    }

    let gateway: Arc<dyn BackendGateway> = Arc::new(HttpGateway::from_config(&config)?);

    match cli.command {
        Some(Commands::Ask {
            file,
            provider,
            dark,
            quiet,
            query,
        }) => {
            let options = AskOptions {
                file,
                provider,
                query: query.join(" "),
                dark,
                quiet,
            };
            run_ask(&config, gateway, options).await
        }
        Some(Commands::Session {
            file,
            provider,
            dark,
        }) => {
            let options = SessionOptions {
                file,
                provider,
                dark,
            };
            run_session(&config, gateway, options).await
        }
        Some(Commands::Providers) => Ok(()),
        None => run_session(&config, gateway, SessionOptions::default()).await,
    }
}
