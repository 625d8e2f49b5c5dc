//! Stream request constraints
//!
//! Typed versions of the constraint objects handed to the host. They
//! serialize to the same JSON shape hosts accept, including the legacy
//! `mandatory` block some desktop-capture implementations still require.

use serde::{Deserialize, Serialize};

use crate::config::{CameraSettings, ScreenSettings};

/// A numeric value the host should aim for but may relax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ideal {
    pub ideal: u32,
}

impl Ideal {
    pub fn new(ideal: u32) -> Self {
        Self { ideal }
    }
}

/// Legacy desktop-capture block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MandatoryDesktop {
    pub chrome_media_source: String,
    pub chrome_media_source_id: String,
    pub max_frame_rate: u32,
    pub max_width: u32,
    pub max_height: u32,
}

/// Video part of a direct desktop capture request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesktopVideo {
    pub mandatory: MandatoryDesktop,
    pub frame_rate: Ideal,
    pub width: Ideal,
    pub height: Ideal,
    pub display_surface: String,
}

/// Direct capture of a known source id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopConstraints {
    pub audio: bool,
    pub video: DesktopVideo,
}

impl DesktopConstraints {
    /// Request for `source_id` capped at the configured size and rate
    pub fn for_source(source_id: impl Into<String>, screen: &ScreenSettings) -> Self {
        Self {
            audio: false,
            video: DesktopVideo {
                mandatory: MandatoryDesktop {
                    chrome_media_source: "desktop".to_string(),
                    chrome_media_source_id: source_id.into(),
                    max_frame_rate: screen.frame_rate,
                    max_width: screen.max_width,
                    max_height: screen.max_height,
                },
                frame_rate: Ideal::new(screen.frame_rate),
                width: Ideal::new(screen.max_width),
                height: Ideal::new(screen.max_height),
                display_surface: screen.display_surface.clone(),
            },
        }
    }

    /// Source id this request targets
    pub fn source_id(&self) -> &str {
        &self.video.mandatory.chrome_media_source_id
    }
}

/// Video part of a picker request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayVideo {
    pub frame_rate: Ideal,
    pub width: Ideal,
    pub height: Ideal,
}

/// Request for the host-native interactive picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConstraints {
    pub audio: bool,
    pub video: DisplayVideo,
}

impl DisplayConstraints {
    /// Same targets as direct capture, but only as ideal values
    pub fn from_settings(screen: &ScreenSettings) -> Self {
        Self {
            audio: false,
            video: DisplayVideo {
                frame_rate: Ideal::new(screen.frame_rate),
                width: Ideal::new(screen.max_width),
                height: Ideal::new(screen.max_height),
            },
        }
    }
}

/// Video part of a webcam request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraVideo {
    pub width: Ideal,
    pub height: Ideal,
    pub frame_rate: u32,
}

/// Webcam request, video only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConstraints {
    pub audio: bool,
    pub video: CameraVideo,
}

impl CameraConstraints {
    pub fn from_settings(camera: &CameraSettings) -> Self {
        Self {
            audio: false,
            video: CameraVideo {
                width: Ideal::new(camera.width),
                height: Ideal::new(camera.height),
                frame_rate: camera.frame_rate,
            },
        }
    }
}

/// What a `get_user_media` call asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRequest {
    /// Direct capture of a screen or window by id
    Desktop(DesktopConstraints),
    /// Webcam
    Camera(CameraConstraints),
}

impl MediaRequest {
    /// JSON form for hosts that take a constraint object
    pub fn to_json(&self) -> serde_json::Value {
        let value = match self {
            Self::Desktop(c) => serde_json::to_value(c),
            Self::Camera(c) => serde_json::to_value(c),
        };
        // Plain structs of strings, numbers and bools always serialize
        value.unwrap_or(serde_json::Value::Null)
    }
}
