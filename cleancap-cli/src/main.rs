//! Clean Capture CLI
//!
//! Terminal front end for picking a screen or window to share.
//!
//! # Usage
//!
//! ```bash
//! # List capture sources and what would be auto-selected
//! cleancap sources
//!
//! # Share, with the webcam overlay on
//! cleancap share --camera
//!
//! # Jump to the screen recording privacy panel
//! cleancap settings screen
//! ```

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cleancap_core::{CleancapError, ConfigFile};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Clean Capture - share a screen or window with an optional webcam overlay
#[derive(Parser)]
#[command(name = "cleancap")]
#[command(version)]
#[command(about = "Share a screen or window with an optional webcam overlay", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List capture sources and the selection decision
    #[command(alias = "ls")]
    Sources,

    /// Start sharing interactively
    Share(commands::ShareArgs),

    /// Show platform, permission and picker status
    Status,

    /// Open an OS privacy settings panel
    Settings(commands::SettingsArgs),

    /// Manage configuration file
    Config(commands::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("cleancap={}", level).parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(hint) = hint_for(&e) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(ConfigFile::default_path);

    match cli.command {
        Commands::Sources => commands::list_sources(load_config(&config_path)?).await?,
        Commands::Share(args) => commands::share(args, load_config(&config_path)?).await?,
        Commands::Status => commands::status(&config_path).await?,
        Commands::Settings(args) => commands::settings(args).await?,
        Commands::Config(args) => commands::config(args, config_path).await?,
    }

    Ok(())
}

/// Suggestion for the first error in the chain the user can fix themselves
fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .filter_map(|e| e.downcast_ref::<CleancapError>())
        .find(|e| e.is_user_recoverable())
        .and_then(CleancapError::user_hint)
}

fn load_config(path: &std::path::Path) -> Result<ConfigFile> {
    ConfigFile::load_from(path.to_path_buf())
        .with_context(|| format!("Failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_found_under_context() {
        let err = anyhow::Error::new(CleancapError::config("frame rate must be non-zero"))
            .context("Failed to load config.toml");
        assert_eq!(hint_for(&err), Some("Check ~/.config/cleancap/config.toml"));
    }

    #[test]
    fn test_no_hint_for_unrecoverable_errors() {
        let err = anyhow::Error::new(CleancapError::Unsupported("x".to_string()));
        assert_eq!(hint_for(&err), None);
        assert_eq!(hint_for(&anyhow::anyhow!("plain")), None);
    }
}
