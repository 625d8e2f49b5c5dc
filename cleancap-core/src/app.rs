//! Command dispatcher
//!
//! Front ends translate clicks and key presses into [`Command`]s. Commands
//! run one at a time; a second command waits until the first returns.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::directory::{Selection, SourceDirectory};
use crate::host::{CaptureHost, MediaDevices, View};
use crate::notice::Notice;
use crate::platform::SettingsPanel;
use crate::session::{CameraOutcome, CaptureSession, ScreenState, ShareOutcome, TeardownReport};

/// User intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initial page load
    Bootstrap,
    /// Refresh button
    Refresh,
    /// "Try Again" on a remediation panel
    Retry,
    /// Click on a source card
    Select(String),
    /// Show/hide camera button
    ToggleCamera,
    /// "Open Screen Recording Settings" or "Open Camera Settings"
    OpenSettings(SettingsPanel),
    /// Page or process exit
    Teardown,
}

/// What a command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Share(ShareOutcome),
    Grid(usize),
    Remediation(Notice),
    Camera(CameraOutcome),
    SettingsOpened(bool),
    TornDown(TeardownReport),
}

/// Source directory and capture session wired to one view
pub struct App {
    host: Arc<dyn CaptureHost>,
    view: Arc<dyn View>,
    directory: SourceDirectory,
    session: CaptureSession,
}

impl App {
    pub fn new(
        host: Arc<dyn CaptureHost>,
        media: Arc<dyn MediaDevices>,
        view: Arc<dyn View>,
        config: ConfigFile,
    ) -> Self {
        let directory = SourceDirectory::new(host.clone(), config.source_query());
        let session = CaptureSession::new(host.clone(), media, view.clone(), config);
        Self {
            host,
            view,
            directory,
            session,
        }
    }

    pub fn directory(&self) -> &SourceDirectory {
        &self.directory
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    pub fn screen_state(&self) -> ScreenState {
        self.session.screen_state()
    }

    /// Run one command to completion
    pub async fn dispatch(&mut self, command: Command) -> Dispatched {
        debug!("Dispatching {:?}", command);
        match command {
            Command::Bootstrap | Command::Refresh => self.bootstrap().await,
            Command::Retry => {
                self.session.reset();
                self.bootstrap().await
            }
            Command::Select(id) => {
                if let Some(source) = self.directory.take(&id) {
                    info!("User selected {}", source.name);
                }
                Dispatched::Share(self.session.start_screen_share(&id).await)
            }
            Command::ToggleCamera => Dispatched::Camera(self.session.toggle_camera().await),
            Command::OpenSettings(panel) => {
                Dispatched::SettingsOpened(self.host.open_settings(panel).await)
            }
            Command::Teardown => Dispatched::TornDown(self.session.teardown()),
        }
    }

    async fn bootstrap(&mut self) -> Dispatched {
        match self.directory.refresh().await {
            Ok(Selection::Auto(source)) => {
                Dispatched::Share(self.session.start_screen_share(&source.id).await)
            }
            Ok(Selection::Grid(sources)) => {
                self.view.render_grid(&sources);
                self.view.set_picker_visible(true);
                self.session.mark_selecting();
                Dispatched::Grid(sources.len())
            }
            Ok(Selection::Unavailable) => self.show_permission_error().await,
            Err(e) => {
                warn!("Source enumeration failed: {}", e);
                self.show_permission_error().await
            }
        }
    }

    async fn show_permission_error(&mut self) -> Dispatched {
        let statuses = match self.host.media_statuses().await {
            Ok(statuses) => Some(statuses),
            Err(e) => {
                debug!("Media statuses unavailable: {}", e);
                None
            }
        };

        let notice = Notice::permission_required(statuses.as_ref());
        self.view.render_remediation(&notice);
        self.view.set_picker_visible(true);
        self.session.mark_error();
        Dispatched::Remediation(notice)
    }
}
