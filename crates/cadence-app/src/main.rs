use cadence_app::cli::{Cli, read_input, run};
use cadence_core::config::load_config;
use cadence_core::constants::{APP_NAME, CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();

    let config = load_config()?;

    tracing::debug!(app = APP_NAME, file = CONFIG_FILE_NAME, config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping default");
    }

    let text = read_input(cli.command.input())?;
    let output = run(&cli, &config.engine, &text).inspect_err(|e| {
        tracing::error!(error = %e, "Command failed");
    })?;

    println!("{output}");

    Ok(())
}
