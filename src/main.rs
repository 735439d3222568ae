use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::path::Path;

use settings_patcher::cli::{self, Cli, Commands, OutputFormat};
use settings_patcher::config::loader::CONFIG_FILENAME;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "settings_patcher=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        // A bare run is silent on success
        None => cli::commands::apply(config, None, false, OutputFormat::Table, true),
        Some(Commands::Apply {
            settings,
            dry_run,
            format,
        }) => cli::commands::apply(config, settings, dry_run, format, cli.quiet),
        Some(Commands::Check { settings }) => cli::commands::check(config, settings, cli.quiet),
        Some(Commands::Block) => cli::commands::block(config),
        Some(Commands::Init { force }) => cli::commands::init(Path::new(CONFIG_FILENAME), force),
    }
}
