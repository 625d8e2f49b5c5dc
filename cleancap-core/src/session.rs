//! Capture session management
//!
//! Owns the screen and camera stream handles and enforces that a handle is
//! always released before its replacement is requested. Screen acquisition
//! tries a direct, constrained capture of the chosen source first and falls
//! back to the host's own picker.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::constraints::{CameraConstraints, DesktopConstraints, DisplayConstraints, MediaRequest};
use crate::error::{CleancapError, Result};
use crate::host::{CaptureHost, MediaDevices, Surface, View};
use crate::notice::Notice;
use crate::platform::SettingsPanel;
use crate::types::MediaStream;

/// Screen capture lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Nothing requested yet, or reset by a retry
    Idle,
    /// Source grid shown, waiting for a choice
    Selecting,
    /// Waiting for the host to hand out a stream
    Acquiring,
    /// Stream bound to the stage
    Active,
    /// Error panel or alert shown
    Error,
}

/// Which acquisition path produced the screen stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Constrained capture of the chosen source id
    Direct,
    /// Host-native interactive picker
    Picker,
}

/// Result of a screen share request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Stream bound to the stage through the given tier
    Active(Tier),
    /// Both tiers failed; `notice` was alerted
    Failed { notice: Notice, denied: bool },
}

/// Result of a camera request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraOutcome {
    /// New camera stream bound to the overlay
    Started,
    /// Existing stream still live, nothing requested
    AlreadyLive,
    /// Overlay hidden and any stream released
    Stopped,
    /// Acquisition failed; the notice was alerted
    Failed(Notice),
}

/// Holder for at most one stream handle
#[derive(Debug)]
pub struct StreamSlot {
    name: &'static str,
    stream: Option<MediaStream>,
}

impl StreamSlot {
    pub fn new(name: &'static str) -> Self {
        Self { name, stream: None }
    }

    /// Current handle
    pub fn get(&self) -> Option<&MediaStream> {
        self.stream.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_none()
    }

    /// A handle is held and at least one of its tracks is live
    pub fn is_live(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.has_live_tracks())
    }

    /// Stop every track of the held handle and clear it
    ///
    /// Returns the number of tracks stopped. An empty slot stops nothing.
    pub fn release(&mut self) -> usize {
        match self.stream.take() {
            Some(stream) => {
                let stopped = stream.stop_all();
                debug!("Released {} stream {} ({} tracks)", self.name, stream.id(), stopped);
                stopped
            }
            None => 0,
        }
    }

    /// Store a new handle, releasing the previous one first
    pub fn replace(&mut self, stream: MediaStream) {
        self.release();
        self.stream = Some(stream);
    }
}

/// Every piece of mutable capture state, in one place
#[derive(Debug)]
pub struct SessionState {
    pub screen: StreamSlot,
    pub camera: StreamSlot,
    pub camera_enabled: bool,
    pub screen_state: ScreenState,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            screen: StreamSlot::new("screen"),
            camera: StreamSlot::new("camera"),
            camera_enabled: false,
            screen_state: ScreenState::Idle,
        }
    }
}

/// Tracks stopped by a teardown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub screen_tracks: usize,
    pub camera_tracks: usize,
}

/// Acquires, binds and releases the screen and camera streams
pub struct CaptureSession {
    host: Arc<dyn CaptureHost>,
    media: Arc<dyn MediaDevices>,
    view: Arc<dyn View>,
    config: ConfigFile,
    state: SessionState,
}

impl CaptureSession {
    pub fn new(
        host: Arc<dyn CaptureHost>,
        media: Arc<dyn MediaDevices>,
        view: Arc<dyn View>,
        config: ConfigFile,
    ) -> Self {
        Self {
            host,
            media,
            view,
            config,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn screen_state(&self) -> ScreenState {
        self.state.screen_state
    }

    pub fn camera_enabled(&self) -> bool {
        self.state.camera_enabled
    }

    pub fn mark_selecting(&mut self) {
        self.state.screen_state = ScreenState::Selecting;
    }

    pub fn mark_error(&mut self) {
        self.state.screen_state = ScreenState::Error;
    }

    /// Back to idle after a retry
    pub fn reset(&mut self) {
        if self.state.screen_state != ScreenState::Active {
            self.state.screen_state = ScreenState::Idle;
        }
    }

    /// Share `source_id`, falling back to the system picker
    pub async fn start_screen_share(&mut self, source_id: &str) -> ShareOutcome {
        self.state.screen_state = ScreenState::Acquiring;

        // Never hold two exclusive claims on the same display
        self.state.screen.release();

        let request =
            MediaRequest::Desktop(DesktopConstraints::for_source(source_id, &self.config.screen));
        info!("Requesting direct capture of {}", source_id);

        let direct_error = match self.media.get_user_media(&request).await {
            Ok(stream) if stream.has_live_video() => {
                return self.activate_screen(stream, Tier::Direct).await;
            }
            Ok(stream) => {
                debug!(
                    "Direct capture of {} returned no live video tracks, using picker",
                    source_id
                );
                stream.stop_all();
                None
            }
            Err(e) => {
                warn!("Direct capture of {} failed: {}", source_id, e);
                Some(e)
            }
        };

        match self.start_with_system_picker().await {
            Ok(stream) => self.activate_screen(stream, Tier::Picker).await,
            Err(e) => self.screen_failure(direct_error, e).await,
        }
    }

    /// Ask the host-native picker for a screen stream
    ///
    /// Does not bind anything; [`start_screen_share`](Self::start_screen_share)
    /// decides what to do with the result.
    pub async fn start_with_system_picker(&mut self) -> Result<MediaStream> {
        if !self.media.supports_display_media() {
            return Err(CleancapError::PickerUnavailable);
        }

        self.state.screen.release();

        let constraints = DisplayConstraints::from_settings(&self.config.screen);
        info!("Opening system display picker");
        self.media.get_display_media(&constraints).await
    }

    async fn activate_screen(&mut self, stream: MediaStream, tier: Tier) -> ShareOutcome {
        info!(
            "Screen share active via {:?} tier: stream {} ({} video tracks)",
            tier,
            stream.id(),
            stream.video_track_count()
        );

        self.view.set_picker_visible(false);
        self.view.set_stage_visible(true);
        self.view.bind(Surface::Screen, Some(&stream));
        self.state.screen.replace(stream);
        self.state.screen_state = ScreenState::Active;

        if let Err(e) = self.view.play(Surface::Screen).await {
            debug!("Screen playback did not start: {}", e);
        }

        ShareOutcome::Active(tier)
    }

    async fn screen_failure(
        &mut self,
        direct_error: Option<CleancapError>,
        picker_error: CleancapError,
    ) -> ShareOutcome {
        warn!("Screen share failed: {}", picker_error);
        self.state.screen_state = ScreenState::Error;

        let denied = picker_error.is_denial()
            || direct_error.as_ref().is_some_and(CleancapError::is_denial);

        let notice = if denied {
            Notice::screen_denied()
        } else if matches!(picker_error.root(), CleancapError::PickerUnavailable) {
            Notice::picker_unavailable()
        } else {
            Notice::screen_failed(&picker_error.description())
        };

        self.view.alert(&notice);

        if denied && self.config.remediation.open_settings_on_denial {
            if !self.host.open_settings(SettingsPanel::ScreenCapture).await {
                debug!("No screen recording settings panel on this platform");
            }
        }

        ShareOutcome::Failed { notice, denied }
    }

    /// Start the webcam overlay unless a live camera stream exists
    pub async fn show_camera(&mut self) -> CameraOutcome {
        if self.state.camera.is_live() {
            return CameraOutcome::AlreadyLive;
        }

        // A held stream with only ended tracks still owns its handle
        self.state.camera.release();

        let request = MediaRequest::Camera(CameraConstraints::from_settings(&self.config.camera));
        let stream = match self.media.get_user_media(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Camera error: {}", e);
                let notice = if e.is_denial() {
                    Notice::camera_denied()
                } else {
                    Notice::camera_failed()
                };
                self.view.alert(&notice);
                return CameraOutcome::Failed(notice);
            }
        };

        info!("Camera started: stream {}", stream.id());
        self.view.bind(Surface::Camera, Some(&stream));
        self.state.camera.replace(stream);
        self.view.set_camera_overlay_visible(true);
        self.state.camera_enabled = true;
        self.view.set_camera_toggle_label("Hide Camera");

        if let Err(e) = self.view.play(Surface::Camera).await {
            debug!("Camera playback did not start: {}", e);
        }

        CameraOutcome::Started
    }

    /// Hide the overlay and release the camera
    pub fn hide_camera(&mut self) -> CameraOutcome {
        self.view.set_camera_overlay_visible(false);
        if !self.state.camera.is_empty() {
            let stopped = self.state.camera.release();
            self.view.bind(Surface::Camera, None);
            info!("Camera stopped ({} tracks)", stopped);
        }
        self.state.camera_enabled = false;
        self.view.set_camera_toggle_label("Show Camera");
        CameraOutcome::Stopped
    }

    /// Flip the camera between shown and hidden
    pub async fn toggle_camera(&mut self) -> CameraOutcome {
        if self.state.camera_enabled {
            self.hide_camera()
        } else {
            self.show_camera().await
        }
    }

    /// Release both streams regardless of UI state
    pub fn teardown(&mut self) -> TeardownReport {
        let report = TeardownReport {
            screen_tracks: self.state.screen.release(),
            camera_tracks: self.state.camera.release(),
        };
        if report.screen_tracks + report.camera_tracks > 0 {
            info!(
                "Teardown stopped {} screen and {} camera tracks",
                report.screen_tracks, report.camera_tracks
            );
        }
        self.state.camera_enabled = false;
        report
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
