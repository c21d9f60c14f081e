//! Livro Landing - landing page and lead capture service
//!
//! Main entry point for the server.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use livro_landing::i18n::site_config;
use livro_landing::lead::{ConfiguredMailer, LeadService};
use livro_landing::server;
use livro_landing::storage::config::{get_config_path, load_config, save_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting livro-landing v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config().context("failed to load configuration")?;
    if !get_config_path().exists() {
        match save_config(&config) {
            Ok(()) => tracing::info!("Wrote default configuration to {}", get_config_path().display()),
            Err(e) => tracing::warn!("Could not write default configuration: {}", e),
        }
    }
    config.apply_env_overrides();

    let site = site_config()
        .and_then(|site| site.with_default(&config.i18n.default_locale))
        .context("invalid translation setup")?;

    let mailer = ConfiguredMailer::from_settings(&config.mail)?;
    let leads = LeadService::new(mailer, config.mail.clone());

    server::build(&config.server, site, leads)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("server failed: {}", e))?;

    tracing::info!("Server stopped");
    Ok(())
}
