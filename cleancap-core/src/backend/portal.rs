//! xdg-desktop-portal host
//!
//! Uses ashpd to talk to the ScreenCast and Camera portals. Wayland does
//! not let clients enumerate outputs or windows, so listing returns portal
//! placeholders and every screen share ends up in the portal's own picker.

use ashpd::desktop::camera::Camera;
use ashpd::desktop::screencast::{CursorMode, Screencast, SourceType};
use ashpd::desktop::Session;
use ashpd::{enumflags2::BitFlags, WindowIdentifier};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::os::fd::OwnedFd;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::constraints::{DisplayConstraints, MediaRequest};
use crate::error::{CleancapError, Result};
use crate::host::{CaptureHost, MediaDevices};
use crate::platform::{Platform, SettingsPanel};
use crate::types::{
    CaptureSource, MediaAccessStatus, MediaStream, MediaTrack, SourceKind, SourceQuery, TrackKind,
};

/// Host backed by xdg-desktop-portal
pub struct PortalHost {
    next_stream: AtomicU64,
}

impl PortalHost {
    pub fn new() -> Self {
        Self {
            next_stream: AtomicU64::new(1),
        }
    }

    fn stream_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_stream.fetch_add(1, Ordering::SeqCst))
    }

    async fn open_camera(&self) -> Result<MediaStream> {
        let camera = Camera::new().await?;
        if !camera.is_present().await? {
            return Err(CleancapError::acquisition("No camera available"));
        }

        // Shows the portal consent dialog; a refusal comes back as a response error
        camera.request_access().await?.response()?;
        let fd = camera.open_pipe_wire_remote().await?;
        info!("Camera portal granted access");

        let remote = PortalRemote::new(fd, 1, None);
        let track: Arc<dyn MediaTrack> = Arc::new(PortalTrack::new(
            TrackKind::Video,
            "Portal camera".to_string(),
            remote,
        ));
        Ok(MediaStream::new(self.stream_id("camera"), vec![track]))
    }
}

impl Default for PortalHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureHost for PortalHost {
    async fn list_sources(&self, query: &SourceQuery) -> Result<Vec<CaptureSource>> {
        debug!("Source listing on Wayland is limited to portal placeholders");

        let mut sources = Vec::new();
        if query.kinds.contains(&SourceKind::Screen) {
            sources.push(CaptureSource::screen(
                "screen:portal",
                "Entire Screen (via Portal)",
            ));
        }
        if query.kinds.contains(&SourceKind::Window) {
            sources.push(CaptureSource::window("window:portal", "Window (via Portal)"));
        }
        Ok(sources)
    }

    async fn check_screen_permission(&self) -> Result<bool> {
        // The portal asks for consent when capture starts
        Ok(true)
    }

    async fn open_settings(&self, panel: SettingsPanel) -> bool {
        super::open_settings_panel(Platform::Linux, panel)
    }

    async fn media_statuses(&self) -> Result<MediaAccessStatus> {
        Ok(MediaAccessStatus::unknown(Platform::Linux))
    }
}

#[async_trait]
impl MediaDevices for PortalHost {
    async fn get_user_media(&self, request: &MediaRequest) -> Result<MediaStream> {
        match request {
            MediaRequest::Desktop(constraints) => Err(CleancapError::Unsupported(format!(
                "direct capture of {} is not available through the portal",
                constraints.source_id()
            ))),
            MediaRequest::Camera(_) => self.open_camera().await,
        }
    }

    fn supports_display_media(&self) -> bool {
        true
    }

    async fn get_display_media(&self, constraints: &DisplayConstraints) -> Result<MediaStream> {
        let screencast = Screencast::new().await?;

        info!("Creating screencast session via portal");
        let session = screencast.create_session().await?;

        let (labels, fd) = match start_screencast(&screencast, &session, constraints).await {
            Ok(started) => started,
            Err(e) => {
                // A cancelled or failed dialog still leaves the session open
                if let Err(close_err) = session.close().await {
                    debug!("Failed to close screencast session: {}", close_err);
                }
                return Err(e);
            }
        };

        let remote = PortalRemote::new(fd, labels.len(), Some(close_on_release(session)));
        let tracks: Vec<Arc<dyn MediaTrack>> = labels
            .into_iter()
            .map(|label| {
                Arc::new(PortalTrack::new(TrackKind::Video, label, remote.clone()))
                    as Arc<dyn MediaTrack>
            })
            .collect();

        info!("Screencast started with {} streams", tracks.len());
        Ok(MediaStream::new(self.stream_id("screencast"), tracks))
    }
}

type ScreencastSession = Session<'static, Screencast<'static>>;

/// Runs once the last track of a portal grant stops
type OnRelease = Box<dyn FnOnce() + Send>;

/// Show the portal dialog and open the PipeWire remote for the chosen streams
///
/// Returns one label per stream.
async fn start_screencast(
    screencast: &Screencast<'static>,
    session: &ScreencastSession,
    constraints: &DisplayConstraints,
) -> Result<(Vec<String>, OwnedFd)> {
    let source_type: BitFlags<SourceType> = SourceType::Monitor | SourceType::Window;
    debug!(
        "Requesting source selection: {:?}, target {}x{}@{}",
        source_type,
        constraints.video.width.ideal,
        constraints.video.height.ideal,
        constraints.video.frame_rate.ideal
    );

    // Triggers the portal dialog
    screencast
        .select_sources(
            session,
            CursorMode::Embedded,
            source_type,
            false,
            None,
            ashpd::desktop::PersistMode::DoNot,
        )
        .await?;

    let response = screencast
        .start(session, None::<&WindowIdentifier>)
        .await?
        .response()?;

    let streams = response.streams();
    if streams.is_empty() {
        return Err(CleancapError::acquisition("No streams returned from portal"));
    }

    let labels = streams
        .iter()
        .map(|stream| {
            let kind = match stream.source_type() {
                Some(SourceType::Window) => SourceKind::Window,
                _ => SourceKind::Screen,
            };
            let (width, height) = stream.size().unwrap_or((0, 0));
            format!(
                "{} (PipeWire node {}, {}x{})",
                kind,
                stream.pipe_wire_node_id(),
                width,
                height
            )
        })
        .collect();

    let fd = screencast.open_pipe_wire_remote(session).await?;
    Ok((labels, fd))
}

/// Close the portal session in the background once its tracks are gone
fn close_on_release(session: ScreencastSession) -> OnRelease {
    Box::new(move || match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                match session.close().await {
                    Ok(()) => debug!("Closed screencast session"),
                    Err(e) => warn!("Failed to close screencast session: {}", e),
                }
            });
        }
        Err(_) => warn!("No async runtime to close the screencast session on"),
    })
}

/// PipeWire remote shared by the tracks of one portal grant
struct PortalRemote {
    fd: Mutex<Option<OwnedFd>>,
    on_release: Mutex<Option<OnRelease>>,
    live_tracks: AtomicUsize,
}

impl PortalRemote {
    fn new(fd: OwnedFd, tracks: usize, on_release: Option<OnRelease>) -> Arc<Self> {
        Arc::new(Self {
            fd: Mutex::new(Some(fd)),
            on_release: Mutex::new(on_release),
            live_tracks: AtomicUsize::new(tracks),
        })
    }

    fn track_stopped(&self) {
        if self.live_tracks.fetch_sub(1, Ordering::SeqCst) != 1 {
            return;
        }

        // Closing the remote ends PipeWire access for this grant
        if self.fd.lock().take().is_some() {
            debug!("Closed PipeWire remote");
        }
        let on_release = self.on_release.lock().take();
        if let Some(release) = on_release {
            release();
        }
    }
}

struct PortalTrack {
    kind: TrackKind,
    label: String,
    live: AtomicBool,
    remote: Arc<PortalRemote>,
}

impl PortalTrack {
    fn new(kind: TrackKind, label: String, remote: Arc<PortalRemote>) -> Self {
        Self {
            kind,
            label,
            live: AtomicBool::new(true),
            remote,
        }
    }
}

impl MediaTrack for PortalTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            self.remote.track_stopped();
        }
    }
}
