//! Platform detection and OS settings targets

use serde::{Deserialize, Serialize};

/// Operating system family the process runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Other,
}

/// OS privacy panel to open as a remediation action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsPanel {
    /// Screen recording permission
    ScreenCapture,
    /// Camera permission
    Camera,
}

impl Platform {
    /// Platform of the running process
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Whether the OS exposes per-device permission status
    pub fn reports_media_access(&self) -> bool {
        matches!(self, Self::MacOs)
    }

    /// URI that opens the given settings panel, if the platform has one
    pub fn settings_uri(&self, panel: SettingsPanel) -> Option<&'static str> {
        match (self, panel) {
            (Self::MacOs, SettingsPanel::ScreenCapture) => Some(
                "x-apple.systempreferences:com.apple.preference.security?Privacy_ScreenCapture",
            ),
            (Self::MacOs, SettingsPanel::Camera) => {
                Some("x-apple.systempreferences:com.apple.preference.security?Privacy_Camera")
            }
            // Windows has no screen-capture privacy page; the webcam page is the closest
            (Self::Windows, _) => Some("ms-settings:privacy-webcam"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for SettingsPanel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "screen" | "screen-capture" | "screen_capture" => Ok(Self::ScreenCapture),
            "camera" | "webcam" => Ok(Self::Camera),
            _ => Err(format!("Unknown settings panel: {}", s)),
        }
    }
}
