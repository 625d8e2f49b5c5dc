//! Error types for Clean Capture

use thiserror::Error;

/// Result type alias using CleancapError
pub type Result<T> = std::result::Result<T, CleancapError>;

/// Main error type for Clean Capture operations
#[derive(Debug, Error)]
pub enum CleancapError {
    /// Host failed to list capture sources
    #[error("Source enumeration failed: {0}")]
    Enumeration(String),

    /// User or OS refused a capture permission
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Stream acquisition failed for any reason other than a denial
    #[error("Acquisition failed: {0}")]
    Acquisition(String),

    /// Host has no interactive display picker
    #[error("System display picker not available")]
    PickerUnavailable,

    /// Surface refused to start playback
    #[error("Playback failed: {0}")]
    Playback(String),

    /// Portal/D-Bus communication error
    #[error("Portal error: {0}")]
    Portal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported operation
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleancapError>,
    },
}

impl CleancapError {
    /// Create an enumeration error
    pub fn enumeration(msg: impl Into<String>) -> Self {
        Self::Enumeration(msg.into())
    }

    /// Create a permission-denied error
    pub fn denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Create an acquisition error
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    /// Create a portal error
    pub fn portal(msg: impl Into<String>) -> Self {
        Self::Portal(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any context layers
    pub fn root(&self) -> &CleancapError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error carries the denial tag
    pub fn is_denial(&self) -> bool {
        matches!(self.root(), Self::PermissionDenied(_))
    }

    /// Message describing the underlying failure without its category prefix
    pub fn description(&self) -> String {
        match self.root() {
            Self::Enumeration(msg)
            | Self::PermissionDenied(msg)
            | Self::Acquisition(msg)
            | Self::Playback(msg)
            | Self::Portal(msg)
            | Self::Config(msg)
            | Self::Unsupported(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Suggestion shown next to the error
    pub fn user_hint(&self) -> Option<&'static str> {
        match self.root() {
            Self::Enumeration(_) => Some(
                "Allow screen recording for this application, then use 'Try Again'",
            ),
            Self::PermissionDenied(_) => {
                Some("Grant the permission in system settings (cleancap settings)")
            }
            Self::Acquisition(_) => Some("Close other applications using the device and retry"),
            Self::PickerUnavailable => {
                Some("Make sure xdg-desktop-portal and a backend for your desktop are running")
            }
            Self::Portal(_) => Some("Check that xdg-desktop-portal is running"),
            Self::Config(_) => Some("Check ~/.config/cleancap/config.toml"),
            _ => None,
        }
    }

    /// Whether the user can fix this without a code change
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self.root(),
            Self::Enumeration(_)
                | Self::PermissionDenied(_)
                | Self::Acquisition(_)
                | Self::Playback(_)
                | Self::Portal(_)
                | Self::Config(_)
        )
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

// Conversions from external error types

#[cfg(target_os = "linux")]
impl From<ashpd::Error> for CleancapError {
    fn from(err: ashpd::Error) -> Self {
        match err {
            // The portal reports a cancelled or refused dialog as a response error
            ashpd::Error::Response(_) => Self::PermissionDenied(err.to_string()),
            other => Self::Portal(other.to_string()),
        }
    }
}
