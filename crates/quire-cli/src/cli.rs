use clap::{Parser, Subcommand, ValueEnum};
use quire_config::AncestorTracking;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages (default for verbose)
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output format for rendered memos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text with card gutters
    #[default]
    Text,
    /// Standalone HTML page
    Html,
    /// Render tree as JSON
    Json,
}

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "quire - render memos with embedded memo transclusion")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses config file value or defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/quire/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of <uid>.md memo files (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub memos_dir: Option<PathBuf>,

    /// Ancestor tracking for embeds: path or pass (overrides config file)
    #[arg(long, global = true)]
    pub tracking: Option<AncestorTracking>,
}

impl Cli {
    /// Effective log level: --verbose, then --log-level, then `configured`
    ///
    /// An unparseable configured level falls back to warn.
    pub fn level_filter(&self, configured: &str) -> LevelFilter {
        if self.verbose {
            return LevelFilter::DEBUG;
        }
        if let Some(level) = self.log_level {
            return level.into();
        }
        configured.parse().unwrap_or(LevelFilter::WARN)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a memo and everything it embeds
    Render {
        /// Memo uid
        uid: String,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Render the memo as a lone embed with these parameters,
        /// e.g. "snippet" or "snippet&inline"
        #[arg(short = 'p', long)]
        params: Option<String>,
    },

    /// Print a memo's snippet
    Snippet {
        /// Memo uid
        uid: String,
    },

    /// List memos in the memo directory
    List,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write an example config file
    Init {
        /// Where to write it (defaults to ~/.config/quire/config.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Output format (toml, json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
}
