//! Host for platforms without a native capture backend in this build

use async_trait::async_trait;
use tracing::warn;

use crate::constraints::{DisplayConstraints, MediaRequest};
use crate::error::{CleancapError, Result};
use crate::host::{CaptureHost, MediaDevices};
use crate::platform::{Platform, SettingsPanel};
use crate::types::{CaptureSource, MediaAccessStatus, MediaStream, SourceQuery};

/// Stub host: no enumeration, no acquisition
pub struct StubHost {
    platform: Platform,
}

impl StubHost {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }
}

impl Default for StubHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureHost for StubHost {
    async fn list_sources(&self, _query: &SourceQuery) -> Result<Vec<CaptureSource>> {
        warn!("No capture backend for {}", self.platform);
        Ok(Vec::new())
    }

    async fn check_screen_permission(&self) -> Result<bool> {
        Ok(true)
    }

    async fn open_settings(&self, panel: SettingsPanel) -> bool {
        super::open_settings_panel(self.platform, panel)
    }

    async fn media_statuses(&self) -> Result<MediaAccessStatus> {
        Ok(MediaAccessStatus::unknown(self.platform))
    }
}

#[async_trait]
impl MediaDevices for StubHost {
    async fn get_user_media(&self, _request: &MediaRequest) -> Result<MediaStream> {
        Err(CleancapError::Unsupported(format!(
            "media capture on {}",
            self.platform
        )))
    }

    fn supports_display_media(&self) -> bool {
        false
    }

    async fn get_display_media(&self, _constraints: &DisplayConstraints) -> Result<MediaStream> {
        Err(CleancapError::PickerUnavailable)
    }
}
