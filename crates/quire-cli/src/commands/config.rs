use anyhow::{Context, Result};
use colored::Colorize;
use quire_config::QuireConfig;
use std::path::PathBuf;

use crate::cli::ConfigCommands;

/// Execute config subcommand
pub async fn execute(cmd: ConfigCommands, config: QuireConfig) -> Result<()> {
    match cmd {
        ConfigCommands::Init { path, force } => init(path, force),
        ConfigCommands::Show { format } => show(&config, &format),
    }
}

/// Write an example config file
fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => QuireConfig::default_config_path().context("Could not determine config file path")?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {} (use --force to overwrite)",
            config_path.display()
        );
    }

    QuireConfig::create_example(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Created config file at: {}",
        "Success:".green().bold(),
        config_path.display()
    );
    println!("{}", "Set store.memos_dir to point at your memos.".dimmed());
    Ok(())
}

/// Print the effective configuration
fn show(config: &QuireConfig, format: &str) -> Result<()> {
    match format {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(config).context("Failed to serialize config")?
        ),
        "toml" => print!("{}", config.to_toml_string()?),
        other => anyhow::bail!("Unknown config format: {other} (expected toml or json)"),
    }
    Ok(())
}
