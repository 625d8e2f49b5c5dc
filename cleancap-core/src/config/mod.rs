//! Configuration for Clean Capture
//!
//! Capture targets for the screen and camera streams, enumeration settings
//! and remediation behavior, loaded from a TOML file.

mod file;

pub use file::{
    sample_config, CameraSettings, ConfigFile, RemediationSettings, ScreenSettings,
    SourceSettings,
};
