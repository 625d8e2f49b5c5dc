//! Collaborator interfaces
//!
//! Everything that touches the operating system or the page goes through
//! these traits. Production code injects a system backend and a front end;
//! tests inject fakes.

use async_trait::async_trait;

use crate::constraints::{DisplayConstraints, MediaRequest};
use crate::error::Result;
use crate::notice::Notice;
use crate::platform::SettingsPanel;
use crate::types::{CaptureSource, MediaAccessStatus, MediaStream, SourceQuery};

/// Source enumeration, permission checks and OS settings
#[async_trait]
pub trait CaptureHost: Send + Sync {
    /// List capture sources of the requested kinds
    async fn list_sources(&self, query: &SourceQuery) -> Result<Vec<CaptureSource>>;

    /// Whether screen recording is currently allowed
    async fn check_screen_permission(&self) -> Result<bool>;

    /// Open an OS privacy panel; `false` when the platform has none
    async fn open_settings(&self, panel: SettingsPanel) -> bool;

    /// Current camera/microphone permission status
    async fn media_statuses(&self) -> Result<MediaAccessStatus>;
}

/// Stream acquisition
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Acquire a stream for a constrained request
    ///
    /// Denials are reported as [`CleancapError::PermissionDenied`].
    ///
    /// [`CleancapError::PermissionDenied`]: crate::error::CleancapError::PermissionDenied
    async fn get_user_media(&self, request: &MediaRequest) -> Result<MediaStream>;

    /// Whether [`get_display_media`](Self::get_display_media) is usable
    fn supports_display_media(&self) -> bool;

    /// Let the user pick a screen or window through the host's own dialog
    async fn get_display_media(&self, constraints: &DisplayConstraints) -> Result<MediaStream>;
}

/// Video surface on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Main viewing stage
    Screen,
    /// Webcam overlay
    Camera,
}

/// The page the flow renders into
#[async_trait]
pub trait View: Send + Sync {
    /// Show clickable source cards, in order
    fn render_grid(&self, sources: &[CaptureSource]);

    /// Replace the picker content with a remediation panel
    fn render_remediation(&self, notice: &Notice);

    fn set_picker_visible(&self, visible: bool);

    fn set_stage_visible(&self, visible: bool);

    fn set_camera_overlay_visible(&self, visible: bool);

    /// Caption of the camera toggle button
    fn set_camera_toggle_label(&self, label: &str);

    /// Attach a stream to a surface, or detach with `None`
    fn bind(&self, surface: Surface, stream: Option<&MediaStream>);

    /// Start playback on a surface
    async fn play(&self, surface: Surface) -> Result<()>;

    /// Alert-style notification
    fn alert(&self, notice: &Notice);
}
