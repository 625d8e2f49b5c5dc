//! System hosts
//!
//! Linux goes through xdg-desktop-portal. Other platforms get a stub that
//! only knows how to open the OS settings panels.

#[cfg(target_os = "linux")]
mod portal;

#[cfg(not(target_os = "linux"))]
mod stub;

#[cfg(target_os = "linux")]
pub use portal::PortalHost as SystemHost;

#[cfg(not(target_os = "linux"))]
pub use stub::StubHost as SystemHost;

use std::process::Command;
use tracing::{debug, warn};

use crate::platform::{Platform, SettingsPanel};

/// Launch the platform settings URI for `panel` with the OS opener
///
/// Fire-and-forget: returns whether a launcher was started.
pub fn open_settings_panel(platform: Platform, panel: SettingsPanel) -> bool {
    let Some(uri) = platform.settings_uri(panel) else {
        debug!("No settings target for {:?} on {}", panel, platform);
        return false;
    };

    let spawned = match platform {
        Platform::MacOs => Command::new("open").arg(uri).spawn(),
        Platform::Windows => Command::new("cmd").args(["/C", "start", "", uri]).spawn(),
        Platform::Linux | Platform::Other => Command::new("xdg-open").arg(uri).spawn(),
    };

    match spawned {
        Ok(_) => {
            debug!("Opened {}", uri);
            true
        }
        Err(e) => {
            warn!("Failed to open {}: {}", uri, e);
            false
        }
    }
}
