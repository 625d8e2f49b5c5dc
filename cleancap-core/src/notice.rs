//! User-facing messages and remediation actions

use serde::{Deserialize, Serialize};

use crate::platform::SettingsPanel;
use crate::types::MediaAccessStatus;

/// Response the UI offers next to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemediationAction {
    /// Re-run the whole source query
    Retry,
    /// Jump to an OS privacy panel
    OpenSettings(SettingsPanel),
}

impl RemediationAction {
    /// Button caption
    pub fn label(&self) -> &'static str {
        match self {
            Self::Retry => "Try Again",
            Self::OpenSettings(SettingsPanel::ScreenCapture) => "Open Screen Recording Settings",
            Self::OpenSettings(SettingsPanel::Camera) => "Open Camera Settings",
        }
    }
}

/// A message plus the actions offered with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub actions: Vec<RemediationAction>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: RemediationAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Privacy panel the notice offers to open, if any
    pub fn settings_panel(&self) -> Option<SettingsPanel> {
        self.actions.iter().find_map(|a| match a {
            RemediationAction::OpenSettings(panel) => Some(*panel),
            RemediationAction::Retry => None,
        })
    }

    /// Whether the notice offers a settings shortcut
    pub fn offers_settings(&self) -> bool {
        self.settings_panel().is_some()
    }

    /// Panel shown when no source could be listed
    pub fn permission_required(statuses: Option<&MediaAccessStatus>) -> Self {
        let message = match statuses {
            Some(status) => format!("Screen recording permission required. {}", status.summary()),
            None => "Screen recording permission required.".to_string(),
        };
        Self::new(message)
            .with_action(RemediationAction::Retry)
            .with_action(RemediationAction::OpenSettings(SettingsPanel::ScreenCapture))
    }

    pub fn screen_denied() -> Self {
        Self::new(
            "Screen sharing permission denied. Please allow screen recording in system settings.",
        )
        .with_action(RemediationAction::OpenSettings(SettingsPanel::ScreenCapture))
    }

    pub fn screen_failed(description: &str) -> Self {
        Self::new(format!("Failed to start screen share: {}", description))
            .with_action(RemediationAction::Retry)
    }

    pub fn picker_unavailable() -> Self {
        Self::new("System display picker not available").with_action(RemediationAction::Retry)
    }

    pub fn camera_denied() -> Self {
        Self::new("Camera permission denied. Please allow camera access in system settings.")
            .with_action(RemediationAction::OpenSettings(SettingsPanel::Camera))
    }

    pub fn camera_failed() -> Self {
        Self::new("Could not access camera")
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
