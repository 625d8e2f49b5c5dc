//! Core types for Clean Capture
//!
//! Capture sources as reported by the host, live stream handles and
//! point-in-time permission status.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::platform::Platform;

/// Kind of capture source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Whole display
    Screen,
    /// Single application window
    Window,
}

impl SourceKind {
    /// Derive the kind from an id such as `"screen:0"` or `"window:12"`
    pub fn from_id_prefix(id: &str) -> Option<Self> {
        match id.split(':').next()? {
            "screen" => Some(Self::Screen),
            "window" => Some(Self::Window),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Screen => write!(f, "Screen"),
            SourceKind::Window => write!(f, "Window"),
        }
    }
}

/// Preview image attached to a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Encoded image as a `data:` URL
    pub data_url: String,
}

/// An enumerable screen or window available for sharing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSource {
    /// Opaque identifier, prefixed by kind
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Kind tag as reported by the host
    pub kind: SourceKind,
    /// Optional preview
    pub thumbnail: Option<Thumbnail>,
}

impl CaptureSource {
    /// Create a new source
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            thumbnail: None,
        }
    }

    /// Create a screen source
    pub fn screen(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, SourceKind::Screen)
    }

    /// Create a window source
    pub fn window(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, SourceKind::Window)
    }

    /// Attach a thumbnail
    pub fn with_thumbnail(mut self, thumbnail: Thumbnail) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }
}

impl std::fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} ({})", self.id, self.name, self.kind)
    }
}

/// Parameters for a host enumeration call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    /// Kinds to list
    pub kinds: Vec<SourceKind>,
    /// Requested thumbnail size (width, height)
    pub thumbnail_size: (u32, u32),
    /// Ask the host for application icons of windows
    pub fetch_window_icons: bool,
}

impl Default for SourceQuery {
    fn default() -> Self {
        Self {
            kinds: vec![SourceKind::Window, SourceKind::Screen],
            thumbnail_size: (320, 200),
            fetch_window_icons: true,
        }
    }
}

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
}

/// A single live track owned by the host
pub trait MediaTrack: Send + Sync {
    /// What the track carries
    fn kind(&self) -> TrackKind;

    /// Host-provided label
    fn label(&self) -> String;

    /// Whether the track still delivers media
    fn is_live(&self) -> bool;

    /// Release the underlying capture
    fn stop(&self);
}

/// Live handle to zero or more tracks
///
/// Stopping is explicit. Dropping a stream does not release its tracks, so
/// the owner decides exactly when hardware is given back.
#[derive(Clone)]
pub struct MediaStream {
    id: String,
    tracks: Vec<Arc<dyn MediaTrack>>,
}

impl MediaStream {
    /// Create a stream from host tracks
    pub fn new(id: impl Into<String>, tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    /// Host identifier of the stream
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All tracks
    pub fn tracks(&self) -> &[Arc<dyn MediaTrack>] {
        &self.tracks
    }

    /// Number of video tracks
    pub fn video_track_count(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.kind() == TrackKind::Video)
            .count()
    }

    /// At least one video track is present and still live
    pub fn has_live_video(&self) -> bool {
        self.tracks
            .iter()
            .any(|t| t.kind() == TrackKind::Video && t.is_live())
    }

    /// At least one track is still live
    pub fn has_live_tracks(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }

    /// Stop every track, returning how many were stopped
    pub fn stop_all(&self) -> usize {
        for track in &self.tracks {
            track.stop();
        }
        self.tracks.len()
    }
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field("tracks", &self.tracks.len())
            .field("video", &self.video_track_count())
            .finish()
    }
}

/// Point-in-time read of OS permission state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAccessStatus {
    /// Camera status string as reported by the OS
    pub camera: String,
    /// Microphone status string as reported by the OS
    pub microphone: String,
    /// Platform the status was read on
    pub platform: Platform,
}

impl MediaAccessStatus {
    /// Status for platforms that cannot report anything
    pub fn unknown(platform: Platform) -> Self {
        Self {
            camera: "unknown".to_string(),
            microphone: "unknown".to_string(),
            platform,
        }
    }

    /// One-line summary used in remediation messages
    pub fn summary(&self) -> String {
        format!("Camera: {}, Microphone: {}.", self.camera, self.microphone)
    }
}
