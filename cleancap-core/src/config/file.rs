//! Configuration file loading and saving
//!
//! Loads user configuration from `~/.config/cleancap/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{CleancapError, Result};
use crate::types::{SourceKind, SourceQuery};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Screen capture targets
    #[serde(default)]
    pub screen: ScreenSettings,

    /// Webcam overlay targets
    #[serde(default)]
    pub camera: CameraSettings,

    /// Source enumeration settings
    #[serde(default)]
    pub sources: SourceSettings,

    /// Error remediation behavior
    #[serde(default)]
    pub remediation: RemediationSettings,
}

/// Screen capture targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSettings {
    /// Maximum capture width in pixels
    #[serde(default = "default_screen_width")]
    pub max_width: u32,

    /// Maximum capture height in pixels
    #[serde(default = "default_screen_height")]
    pub max_height: u32,

    /// Target frame rate
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Preferred display surface hint (monitor, window, browser)
    #[serde(default = "default_display_surface")]
    pub display_surface: String,
}

/// Webcam targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Ideal width in pixels
    #[serde(default = "default_camera_width")]
    pub width: u32,

    /// Ideal height in pixels
    #[serde(default = "default_camera_height")]
    pub height: u32,

    /// Target frame rate
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

/// Source enumeration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Thumbnail width requested from the host
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,

    /// Thumbnail height requested from the host
    #[serde(default = "default_thumbnail_height")]
    pub thumbnail_height: u32,

    /// Request application icons for windows
    #[serde(default = "default_true")]
    pub fetch_window_icons: bool,
}

/// What happens when a capture permission is denied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationSettings {
    /// Open the OS privacy panel right after a screen-share denial
    #[serde(default = "default_true")]
    pub open_settings_on_denial: bool,
}

// Default value functions
fn default_screen_width() -> u32 {
    1920
}

fn default_screen_height() -> u32 {
    1080
}

fn default_frame_rate() -> u32 {
    30
}

fn default_display_surface() -> String {
    "monitor".to_string()
}

fn default_camera_width() -> u32 {
    640
}

fn default_camera_height() -> u32 {
    480
}

fn default_thumbnail_width() -> u32 {
    320
}

fn default_thumbnail_height() -> u32 {
    200
}

fn default_true() -> bool {
    true
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            max_width: default_screen_width(),
            max_height: default_screen_height(),
            frame_rate: default_frame_rate(),
            display_surface: default_display_surface(),
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            width: default_camera_width(),
            height: default_camera_height(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            thumbnail_width: default_thumbnail_width(),
            thumbnail_height: default_thumbnail_height(),
            fetch_window_icons: true,
        }
    }
}

impl Default for RemediationSettings {
    fn default() -> Self {
        Self {
            open_settings_on_denial: true,
        }
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("cleancap").join("config.toml")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("cleancap")
                .join("config.toml")
        } else {
            PathBuf::from("/etc/cleancap/config.toml")
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| CleancapError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| CleancapError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, logging warnings but returning defaults on error
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CleancapError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = self.to_toml()?;

        std::fs::write(&path, content)
            .map_err(|e| CleancapError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CleancapError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Reject values no host can satisfy
    pub fn validate(&self) -> Result<()> {
        if self.screen.max_width == 0 || self.screen.max_height == 0 {
            return Err(CleancapError::config("screen dimensions must be non-zero"));
        }
        if self.screen.frame_rate == 0 || self.camera.frame_rate == 0 {
            return Err(CleancapError::config("frame rate must be non-zero"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(CleancapError::config("camera dimensions must be non-zero"));
        }
        Ok(())
    }

    /// Enumeration query built from the `[sources]` section
    ///
    /// Both kinds are always requested; filtering happens afterwards because
    /// hosts disagree on how they tag screens.
    pub fn source_query(&self) -> SourceQuery {
        SourceQuery {
            kinds: vec![SourceKind::Window, SourceKind::Screen],
            thumbnail_size: (self.sources.thumbnail_width, self.sources.thumbnail_height),
            fetch_window_icons: self.sources.fetch_window_icons,
        }
    }
}

/// Generate a sample configuration file
pub fn sample_config() -> String {
    r#"# Clean Capture Configuration

[screen]
# Upper bound requested for direct desktop capture
max_width = 1920
max_height = 1080

# Target frame rate (also sent as the ideal value to the system picker)
frame_rate = 30

# Display surface hint: monitor, window, browser
display_surface = "monitor"

[camera]
# Ideal webcam resolution and frame rate
width = 640
height = 480
frame_rate = 30

[sources]
# Thumbnail size requested from the host for the picker grid
thumbnail_width = 320
thumbnail_height = 200

# Ask for window icons alongside thumbnails
fetch_window_icons = true

[remediation]
# Open the OS privacy settings panel after a screen-share denial
open_settings_on_denial = true
"#
    .to_string()
}
