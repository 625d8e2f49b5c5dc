//! Source directory
//!
//! Queries the host for screens and windows, decides whether one can be
//! picked automatically, and otherwise orders them for the picker grid.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{CleancapError, Result};
use crate::host::CaptureHost;
use crate::types::{CaptureSource, SourceKind, SourceQuery};

/// Display names that mark a source as a whole screen
const SCREEN_NAME_HINTS: [&str; 3] = ["screen", "display", "entire screen"];

/// Result of applying the selection policy to a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Exactly one candidate; share it without asking
    Auto(CaptureSource),
    /// Let the user choose, in display order
    Grid(Vec<CaptureSource>),
    /// Nothing to share
    Unavailable,
}

/// Whether a source looks like a whole screen
///
/// Hosts tag kinds inconsistently across operating systems, so the id
/// prefix and display name are consulted as well.
pub fn is_screen_candidate(source: &CaptureSource) -> bool {
    if source.kind == SourceKind::Screen {
        return true;
    }
    if SourceKind::from_id_prefix(&source.id) == Some(SourceKind::Screen) {
        return true;
    }
    let name = source.name.to_lowercase();
    SCREEN_NAME_HINTS.iter().any(|hint| name.contains(hint))
}

/// Screens before everything else, each group keeping its original order
pub fn screens_first(sources: Vec<CaptureSource>) -> Vec<CaptureSource> {
    let (mut screens, others): (Vec<_>, Vec<_>) =
        sources.into_iter().partition(is_screen_candidate);
    screens.extend(others);
    screens
}

/// Apply the selection policy
pub fn select(sources: Vec<CaptureSource>) -> Selection {
    let screen_count = sources.iter().filter(|s| is_screen_candidate(s)).count();

    if screen_count == 1 {
        if let Some(screen) = sources.into_iter().find(is_screen_candidate) {
            return Selection::Auto(screen);
        }
        return Selection::Unavailable;
    }

    if screen_count > 1 {
        return Selection::Grid(screens_first(sources));
    }

    // No confident screen, fall back to whatever the host returned
    match sources.len() {
        0 => Selection::Unavailable,
        1 => sources
            .into_iter()
            .next()
            .map(Selection::Auto)
            .unwrap_or(Selection::Unavailable),
        _ => Selection::Grid(sources),
    }
}

/// Lists sources and holds the current listing until a choice is made
pub struct SourceDirectory {
    host: Arc<dyn CaptureHost>,
    query: SourceQuery,
    current: Option<Vec<CaptureSource>>,
}

impl SourceDirectory {
    /// Create a directory over a host
    pub fn new(host: Arc<dyn CaptureHost>, query: SourceQuery) -> Self {
        Self {
            host,
            query,
            current: None,
        }
    }

    /// Discard any previous listing and run the query and policy again
    pub async fn refresh(&mut self) -> Result<Selection> {
        self.current = None;

        if !self.host.check_screen_permission().await? {
            warn!("Screen recording permission not granted");
            return Ok(Selection::Unavailable);
        }

        let sources = self
            .host
            .list_sources(&self.query)
            .await
            .map_err(|e| match e {
                e @ CleancapError::Enumeration(_) => e,
                other => CleancapError::enumeration(other.description()),
            })?;

        info!("Host returned {} capture sources", sources.len());
        for source in &sources {
            debug!(
                "  {} (screen candidate: {})",
                source,
                is_screen_candidate(source)
            );
        }

        let selection = select(sources);
        match &selection {
            Selection::Auto(source) => info!("Auto-selecting {}", source.name),
            Selection::Grid(list) => {
                info!("Presenting {} sources", list.len());
                self.current = Some(list.clone());
            }
            Selection::Unavailable => warn!("No capture sources available"),
        }
        Ok(selection)
    }

    /// Sources currently offered in the grid
    pub fn current(&self) -> &[CaptureSource] {
        self.current.as_deref().unwrap_or(&[])
    }

    /// Look up a source in the current listing
    pub fn find(&self, id: &str) -> Option<&CaptureSource> {
        self.current().iter().find(|s| s.id == id)
    }

    /// Complete a selection, discarding the listing
    pub fn take(&mut self, id: &str) -> Option<CaptureSource> {
        self.current
            .take()
            .and_then(|list| list.into_iter().find(|s| s.id == id))
    }
}
