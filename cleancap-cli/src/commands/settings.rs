//! Settings command - open an OS privacy panel

use anyhow::{anyhow, Result};
use clap::Args;
use cleancap_core::backend::SystemHost;
use cleancap_core::{CaptureHost, Platform, SettingsPanel};

/// Arguments for the settings command
#[derive(Args)]
pub struct SettingsArgs {
    /// Panel to open (screen, camera)
    #[arg(default_value = "screen")]
    panel: String,
}

/// Open the requested privacy panel
pub async fn settings(args: SettingsArgs) -> Result<()> {
    let panel: SettingsPanel = args.panel.parse().map_err(|e: String| anyhow!(e))?;

    let host = SystemHost::new();
    if host.open_settings(panel).await {
        println!("Opened {:?} settings.", panel);
    } else {
        println!(
            "No settings panel to open on {}; grant access through your desktop's own tools.",
            Platform::current()
        );
    }

    Ok(())
}
