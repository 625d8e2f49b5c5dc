//! Status command - show platform and permission status

use anyhow::Result;
use cleancap_core::backend::SystemHost;
use cleancap_core::{CaptureHost, MediaDevices, Platform, SettingsPanel};
use std::path::Path;

/// Show what the host reports about capture permissions
pub async fn status(config_path: &Path) -> Result<()> {
    println!("Clean Capture - Status\n");

    let platform = Platform::current();
    let host = SystemHost::new();

    println!("Platform:          {}", platform);

    match host.check_screen_permission().await {
        Ok(granted) => println!(
            "Screen recording:  {}",
            if granted { "granted" } else { "not granted" }
        ),
        Err(e) => println!("Screen recording:  unknown ({})", e),
    }

    if platform.reports_media_access() {
        match host.media_statuses().await {
            Ok(status) => println!("Media access:      {}", status.summary()),
            Err(e) => println!("Media access:      unknown ({})", e),
        }
    } else {
        println!("Media access:      not reported on {}", platform);
    }

    println!(
        "System picker:     {}",
        if host.supports_display_media() {
            "available"
        } else {
            "not available"
        }
    );

    let settings = platform
        .settings_uri(SettingsPanel::ScreenCapture)
        .unwrap_or("none");
    println!("Settings target:   {}", settings);

    println!();
    println!(
        "Config file:       {}{}",
        config_path.display(),
        if config_path.exists() { "" } else { " (not created)" }
    );

    Ok(())
}
