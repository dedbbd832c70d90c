//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config = Config::load()?;

    // Flags and environment win over the config file
    let ctx = commands::Context {
        api_key: cli.api_key.or(config.api_key),
        secret_key: cli.secret_key.or(config.secret_key),
        base_url: cli.base_url.or(config.base_url),
        page_size: config.page_size,
        output_format: cli.output.or(config.output_format).unwrap_or_default(),
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Show(args) => commands::show::execute(ctx, args).await,
        Commands::Deck(args) => commands::deck::execute(ctx, args).await,
        Commands::Search(args) => commands::search::execute(ctx, args).await,
        Commands::Diff(args) => commands::diff::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}

/// Logs go to stderr so stdout stays clean for JSON and YAML output.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "warn,fabdb_client=debug,fabdb_core=debug,fabdb_cli=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}
