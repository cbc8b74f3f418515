// Entrypoint for the CLI application.
// - Loads `.env` if present, then reads configuration from the environment.
// - Logs go to stderr, filtered by `RUST_LOG` (default `warn`).

use assistant_cli::{api::OpenAiClient, config::Config, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    tracing::debug!(base_url = %config.base_url, menu = ?config.menu, "configuration loaded");

    let api = OpenAiClient::new(config.base_url.clone(), config.api_key.clone())?;

    // Blocks until the operator picks "Exit".
    main_menu(&api, &config)?;
    Ok(())
}
