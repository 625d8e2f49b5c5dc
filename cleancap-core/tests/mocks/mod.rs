//! Mock infrastructure for testing
//!
//! Fake host, fake media devices and a recording view. Every fake writes to
//! one shared event log so tests can assert on ordering across them.

#![allow(dead_code)]

use async_trait::async_trait;
use cleancap_core::constraints::{DisplayConstraints, MediaRequest};
use cleancap_core::error::{CleancapError, Result};
use cleancap_core::host::{CaptureHost, MediaDevices, Surface, View};
use cleancap_core::notice::Notice;
use cleancap_core::platform::{Platform, SettingsPanel};
use cleancap_core::types::{
    CaptureSource, MediaAccessStatus, MediaStream, MediaTrack, SourceQuery, TrackKind,
};
use cleancap_core::{App, CaptureSession, ConfigFile};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Something a fake observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ListSources,
    GetUserMedia(Requested),
    GetDisplayMedia,
    Stop(String),
    OpenSettings(SettingsPanel),
}

/// Which `get_user_media` request was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requested {
    Desktop(String),
    Camera,
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Track that counts how often it is stopped
pub struct FakeTrack {
    label: String,
    kind: TrackKind,
    live: AtomicBool,
    stops: AtomicUsize,
    log: EventLog,
}

impl FakeTrack {
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn end(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

impl MediaTrack for FakeTrack {
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
        self.live.store(false, Ordering::SeqCst);
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push(Event::Stop(self.label.clone()));
    }
}

/// Scripted answer to an acquisition call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scripted {
    /// Stream with this many video tracks
    Video(usize),
    /// Stream whose only video track has already ended
    EndedVideo,
    /// Stream whose only track is audio
    AudioOnly,
    /// Stream with no tracks at all
    Empty,
    /// Denial-tagged error
    Denied,
    /// Any other error
    Failed(&'static str),
}

/// Media devices answering from per-call scripts
pub struct FakeMedia {
    log: EventLog,
    user_media: Mutex<VecDeque<Scripted>>,
    display_media: Mutex<VecDeque<Scripted>>,
    picker_available: bool,
    tracks: Mutex<Vec<Arc<FakeTrack>>>,
    streams: AtomicUsize,
}

impl FakeMedia {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            user_media: Mutex::new(VecDeque::new()),
            display_media: Mutex::new(VecDeque::new()),
            picker_available: true,
            tracks: Mutex::new(Vec::new()),
            streams: AtomicUsize::new(0),
        }
    }

    pub fn without_picker(mut self) -> Self {
        self.picker_available = false;
        self
    }

    /// Queue the answer to the next `get_user_media`; unscripted calls get one video track
    pub fn script_user_media(&self, answer: Scripted) {
        self.user_media.lock().push_back(answer);
    }

    /// Queue the answer to the next `get_display_media`; unscripted calls get one video track
    pub fn script_display_media(&self, answer: Scripted) {
        self.display_media.lock().push_back(answer);
    }

    /// Every track handed out so far
    pub fn tracks(&self) -> Vec<Arc<FakeTrack>> {
        self.tracks.lock().clone()
    }

    fn track(&self, stream: usize, index: usize, kind: TrackKind) -> Arc<dyn MediaTrack> {
        let track = Arc::new(FakeTrack {
            label: format!("stream{}-track{}", stream, index),
            kind,
            live: AtomicBool::new(true),
            stops: AtomicUsize::new(0),
            log: self.log.clone(),
        });
        self.tracks.lock().push(track.clone());
        track
    }

    fn answer(&self, answer: Scripted) -> Result<MediaStream> {
        let n = self.streams.fetch_add(1, Ordering::SeqCst);
        let id = format!("stream{}", n);
        match answer {
            Scripted::Video(count) => {
                let tracks = (0..count)
                    .map(|i| self.track(n, i, TrackKind::Video))
                    .collect();
                Ok(MediaStream::new(id, tracks))
            }
            Scripted::EndedVideo => {
                let track = self.track(n, 0, TrackKind::Video);
                if let Some(fake) = self.tracks.lock().last() {
                    fake.end();
                }
                Ok(MediaStream::new(id, vec![track]))
            }
            Scripted::AudioOnly => Ok(MediaStream::new(
                id,
                vec![self.track(n, 0, TrackKind::Audio)],
            )),
            Scripted::Empty => Ok(MediaStream::new(id, Vec::new())),
            Scripted::Denied => Err(CleancapError::denied("NotAllowedError")),
            Scripted::Failed(msg) => Err(CleancapError::acquisition(msg)),
        }
    }
}

#[async_trait]
impl MediaDevices for FakeMedia {
    async fn get_user_media(&self, request: &MediaRequest) -> Result<MediaStream> {
        let requested = match request {
            MediaRequest::Desktop(c) => Requested::Desktop(c.source_id().to_string()),
            MediaRequest::Camera(_) => Requested::Camera,
        };
        self.log.lock().push(Event::GetUserMedia(requested));
        let answer = self
            .user_media
            .lock()
            .pop_front()
            .unwrap_or(Scripted::Video(1));
        self.answer(answer)
    }

    fn supports_display_media(&self) -> bool {
        self.picker_available
    }

    async fn get_display_media(&self, _constraints: &DisplayConstraints) -> Result<MediaStream> {
        self.log.lock().push(Event::GetDisplayMedia);
        let answer = self
            .display_media
            .lock()
            .pop_front()
            .unwrap_or(Scripted::Video(1));
        self.answer(answer)
    }
}

/// Host with a settable source listing
pub struct FakeHost {
    log: EventLog,
    sources: Mutex<std::result::Result<Vec<CaptureSource>, String>>,
    permission: AtomicBool,
    settings_available: bool,
}

impl FakeHost {
    pub fn new(log: EventLog, sources: Vec<CaptureSource>) -> Self {
        Self {
            log,
            sources: Mutex::new(Ok(sources)),
            permission: AtomicBool::new(true),
            settings_available: true,
        }
    }

    pub fn set_sources(&self, sources: Vec<CaptureSource>) {
        *self.sources.lock() = Ok(sources);
    }

    pub fn fail_listing(&self, msg: &str) {
        *self.sources.lock() = Err(msg.to_string());
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission.store(granted, Ordering::SeqCst);
    }
}

#[async_trait]
impl CaptureHost for FakeHost {
    async fn list_sources(&self, _query: &SourceQuery) -> Result<Vec<CaptureSource>> {
        self.log.lock().push(Event::ListSources);
        self.sources
            .lock()
            .clone()
            .map_err(CleancapError::enumeration)
    }

    async fn check_screen_permission(&self) -> Result<bool> {
        Ok(self.permission.load(Ordering::SeqCst))
    }

    async fn open_settings(&self, panel: SettingsPanel) -> bool {
        self.log.lock().push(Event::OpenSettings(panel));
        self.settings_available
    }

    async fn media_statuses(&self) -> Result<MediaAccessStatus> {
        Ok(MediaAccessStatus {
            camera: "granted".to_string(),
            microphone: "not-determined".to_string(),
            platform: Platform::MacOs,
        })
    }
}

/// Something the view was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Grid(Vec<String>),
    Remediation(Notice),
    Picker(bool),
    Stage(bool),
    CameraOverlay(bool),
    ToggleLabel(String),
    Bind(Surface, Option<String>),
    Play(Surface),
    Alert(Notice),
}

/// View that records every call
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
    fail_play: AtomicBool,
}

impl RecordingView {
    pub fn fail_playback(&self) {
        self.fail_play.store(true, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().clone()
    }

    pub fn alerts(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn grids(&self) -> Vec<Vec<String>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Grid(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl View for RecordingView {
    fn render_grid(&self, sources: &[CaptureSource]) {
        self.push(ViewEvent::Grid(
            sources.iter().map(|s| s.name.clone()).collect(),
        ));
    }

    fn render_remediation(&self, notice: &Notice) {
        self.push(ViewEvent::Remediation(notice.clone()));
    }

    fn set_picker_visible(&self, visible: bool) {
        self.push(ViewEvent::Picker(visible));
    }

    fn set_stage_visible(&self, visible: bool) {
        self.push(ViewEvent::Stage(visible));
    }

    fn set_camera_overlay_visible(&self, visible: bool) {
        self.push(ViewEvent::CameraOverlay(visible));
    }

    fn set_camera_toggle_label(&self, label: &str) {
        self.push(ViewEvent::ToggleLabel(label.to_string()));
    }

    fn bind(&self, surface: Surface, stream: Option<&MediaStream>) {
        self.push(ViewEvent::Bind(surface, stream.map(|s| s.id().to_string())));
    }

    async fn play(&self, surface: Surface) -> Result<()> {
        self.push(ViewEvent::Play(surface));
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(CleancapError::Playback("autoplay blocked".to_string()));
        }
        Ok(())
    }

    fn alert(&self, notice: &Notice) {
        self.push(ViewEvent::Alert(notice.clone()));
    }
}

/// All fakes wired together
pub struct Harness {
    pub log: EventLog,
    pub host: Arc<FakeHost>,
    pub media: Arc<FakeMedia>,
    pub view: Arc<RecordingView>,
}

impl Harness {
    pub fn new(sources: Vec<CaptureSource>) -> Self {
        let log = event_log();
        Self {
            host: Arc::new(FakeHost::new(log.clone(), sources)),
            media: Arc::new(FakeMedia::new(log.clone())),
            view: Arc::new(RecordingView::default()),
            log,
        }
    }

    pub fn without_picker(sources: Vec<CaptureSource>) -> Self {
        let log = event_log();
        Self {
            host: Arc::new(FakeHost::new(log.clone(), sources)),
            media: Arc::new(FakeMedia::new(log.clone()).without_picker()),
            view: Arc::new(RecordingView::default()),
            log,
        }
    }

    pub fn session(&self) -> CaptureSession {
        self.session_with(ConfigFile::default())
    }

    pub fn session_with(&self, config: ConfigFile) -> CaptureSession {
        CaptureSession::new(
            self.host.clone(),
            self.media.clone(),
            self.view.clone(),
            config,
        )
    }

    pub fn app(&self) -> App {
        App::new(
            self.host.clone(),
            self.media.clone(),
            self.view.clone(),
            ConfigFile::default(),
        )
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.lock().clone()
    }

    /// Position of the first event matching `pred`
    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.events().iter().position(|e| pred(e))
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

/// A window listed ahead of the only screen
pub fn finder_and_display() -> Vec<CaptureSource> {
    vec![
        CaptureSource::window("window:1", "Finder"),
        CaptureSource::screen("screen:0", "Display 1"),
    ]
}
