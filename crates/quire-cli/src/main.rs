use anyhow::Result;
use clap::Parser;
use quire_config::QuireConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use quire_cli::{
    cli::{Cli, Commands, ConfigCommands},
    commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `config init` must work even when the existing file is broken
    let config = match &cli.command {
        Commands::Config(ConfigCommands::Init { .. }) => QuireConfig::default(),
        _ => commands::load_config(&cli)?,
    };

    // RUST_LOG still wins for per-module filtering
    let level = cli.level_filter(&config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
    debug!(%level, tracking = %config.render.ancestor_tracking, "configuration loaded");

    match cli.command {
        Commands::Render {
            uid,
            format,
            params,
        } => commands::render::execute(config, uid, format, params).await?,

        Commands::Snippet { uid } => commands::snippet::execute(config, uid).await?,

        Commands::List => commands::list::execute(config).await?,

        Commands::Config(cmd) => commands::config::execute(cmd, config).await?,
    }

    Ok(())
}
