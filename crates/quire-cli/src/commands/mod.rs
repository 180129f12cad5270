//! Subcommand implementations
//!
//! Each command receives the fully resolved [`QuireConfig`] (defaults, file,
//! environment and command-line flags already applied).

pub mod config;
pub mod list;
pub mod render;
pub mod snippet;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use quire_config::{QuireConfig, ENV_MEMOS_DIR};
use quire_core::{DirectorySource, MemoRenderer, MemoStore, RenderOptions};

use crate::cli::Cli;

/// Load configuration and apply command-line overrides on top
pub fn load_config(cli: &Cli) -> Result<QuireConfig> {
    let mut config = QuireConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_cli_overrides(&mut config, cli);
    Ok(config)
}

fn apply_cli_overrides(config: &mut QuireConfig, cli: &Cli) {
    if let Some(dir) = &cli.memos_dir {
        config.store.memos_dir = Some(dir.clone());
    }
    if let Some(tracking) = cli.tracking {
        config.render.ancestor_tracking = tracking;
    }
}

/// Configured memo directory, which must exist
pub fn memos_dir(config: &QuireConfig) -> Result<PathBuf> {
    let dir = config.store.memos_dir.clone().with_context(|| {
        format!("No memo directory configured; pass --memos-dir or set {ENV_MEMOS_DIR}")
    })?;
    anyhow::ensure!(dir.is_dir(), "Memo directory does not exist: {}", dir.display());
    Ok(dir)
}

/// Directory source with the configured snippet length
pub fn directory_source(config: &QuireConfig) -> Result<DirectorySource> {
    Ok(DirectorySource::new(memos_dir(config)?).with_snippet_length(config.render.snippet_length))
}

/// Renderer over the configured memo directory
pub fn renderer(config: &QuireConfig) -> Result<MemoRenderer> {
    let store = MemoStore::new(Arc::new(directory_source(config)?))
        .with_fetch_timeout(config.store.fetch_timeout());
    Ok(MemoRenderer::new(
        Arc::new(store),
        RenderOptions::from_config(&config.render),
    ))
}
