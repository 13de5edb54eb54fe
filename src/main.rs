mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notecue::cli::{Cli, Commands, ConfigCommands};
use notecue::Config;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `-v` flags, then the configured level.
fn init_logging(verbose: u8, configured: &str) {
    let default_filter = match verbose {
        0 => configured.to_string(),
        1 => "notecue=info".to_string(),
        2 => "notecue=debug".to_string(),
        _ => "notecue=trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load();
    let level = loaded
        .as_ref()
        .map(|config| config.log.level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    init_logging(cli.verbose, &level);

    // A broken config file must not lock the user out of `config edit`
    let config = loaded.unwrap_or_else(|e| {
        warn!("{:#}; using default settings", e);
        Config::default()
    });

    match cli.command {
        Commands::Parse { file, json } => commands::parse::handle(&file, json),
        Commands::Simulate(args) => commands::simulate::handle(&args, &config),
        Commands::Stamp(args) => commands::stamp::handle(&args, &config),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(&config),
            ConfigCommands::Edit => commands::config::handle_edit(),
            ConfigCommands::Migrate { yes } => commands::config::handle_migrate(yes),
            ConfigCommands::Path => commands::config::handle_path(),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
