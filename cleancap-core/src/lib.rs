//! Clean Capture Core Library
//!
//! Pick a screen or window to share, optionally overlay a webcam preview,
//! and keep the stream handles behind both honest.
//!
//! This library provides:
//! - A source directory that classifies host-reported sources and decides
//!   between auto-selection and a picker grid
//! - A capture session that acquires the screen stream with a direct tier and
//!   a system-picker fallback, and manages the camera overlay stream
//! - A command dispatcher for front ends
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ Source Directory│───▶│ Capture Session │───▶│ View (surfaces) │
//! │ (CaptureHost)   │    │ (MediaDevices)  │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

pub mod app;
pub mod backend;
pub mod config;
pub mod constraints;
pub mod directory;
pub mod error;
pub mod host;
pub mod notice;
pub mod platform;
pub mod session;
pub mod types;

pub use app::{App, Command, Dispatched};
pub use config::ConfigFile;
pub use directory::{Selection, SourceDirectory};
pub use error::{CleancapError, Result};
pub use host::{CaptureHost, MediaDevices, Surface, View};
pub use notice::{Notice, RemediationAction};
pub use platform::{Platform, SettingsPanel};
pub use session::{CameraOutcome, CaptureSession, ScreenState, ShareOutcome, Tier};
pub use types::{CaptureSource, MediaAccessStatus, MediaStream, MediaTrack, SourceKind};
