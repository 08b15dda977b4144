mod background;
mod cli;
mod commands;
mod content;
mod host;
mod overlay;
mod topology;
mod url;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Filter directive covering `arc_command` and every `arc_*` library crate.
fn log_directive(level: &str) -> String {
    format!("arc={level}")
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    let loaded = match args.config {
        Some(ref path) => arc_config::toml_loader::load_from_path(path),
        None => arc_config::load_config(),
    };

    // Initialize logging. `arc` prefix-matches every workspace crate target.
    let default_directive = match loaded {
        Ok(ref config) => log_directive(&config.logging.level),
        Err(_) => log_directive(DEFAULT_LOG_LEVEL),
    };
    let directive = args.log_level.as_deref().unwrap_or(&default_directive);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| log_directive(DEFAULT_LOG_LEVEL).parse().unwrap()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("arc-command v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        arc_config::ArcConfig::default()
    });

    if let Err(e) = commands::run(args.command, &config).await {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}
