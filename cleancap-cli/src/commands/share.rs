//! Share command - drive the picker flow from the terminal

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use cleancap_core::backend::SystemHost;
use cleancap_core::session::TeardownReport;
use cleancap_core::{
    App, CameraOutcome, CaptureSource, Command, ConfigFile, Dispatched, MediaStream, Notice,
    SettingsPanel, ShareOutcome, Surface, View,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{debug, warn};

/// Arguments for the share command
#[derive(Args)]
pub struct ShareArgs {
    /// Source ID to share directly, skipping enumeration
    #[arg(short, long)]
    source: Option<String>,

    /// Show the webcam overlay from the start
    #[arg(short, long)]
    camera: bool,
}

/// Prints surface changes and remembers the last grid for numbered selection
#[derive(Default)]
struct TerminalView {
    grid: Mutex<Vec<CaptureSource>>,
    /// Panel offered by the most recent notice
    offered_panel: Mutex<Option<SettingsPanel>>,
}

impl TerminalView {
    fn grid_ids(&self) -> Vec<String> {
        self.grid.lock().iter().map(|s| s.id.clone()).collect()
    }

    fn settings_panel(&self) -> SettingsPanel {
        (*self.offered_panel.lock()).unwrap_or(SettingsPanel::ScreenCapture)
    }

    fn remember_offer(&self, notice: &Notice) {
        if let Some(panel) = notice.settings_panel() {
            *self.offered_panel.lock() = Some(panel);
        }
    }
}

#[async_trait]
impl View for TerminalView {
    fn render_grid(&self, sources: &[CaptureSource]) {
        println!("Choose a source:");
        for (i, source) in sources.iter().enumerate() {
            println!("  [{}] {} ({})", i + 1, source.name, source.kind);
        }
        *self.grid.lock() = sources.to_vec();
    }

    fn render_remediation(&self, notice: &Notice) {
        self.grid.lock().clear();
        self.remember_offer(notice);
        println!("{}", notice.message);
        for action in &notice.actions {
            println!("  - {}", action.label());
        }
    }

    fn set_picker_visible(&self, visible: bool) {
        debug!("Picker visible: {}", visible);
    }

    fn set_stage_visible(&self, visible: bool) {
        debug!("Stage visible: {}", visible);
    }

    fn set_camera_overlay_visible(&self, visible: bool) {
        debug!("Camera overlay visible: {}", visible);
    }

    fn set_camera_toggle_label(&self, label: &str) {
        println!("[c] {}", label);
    }

    fn bind(&self, surface: Surface, stream: Option<&MediaStream>) {
        match stream {
            Some(stream) => {
                let labels: Vec<String> = stream.tracks().iter().map(|t| t.label()).collect();
                println!("{:?}: {} [{}]", surface, stream.id(), labels.join(", "));
            }
            None => println!("{:?}: detached", surface),
        }
    }

    async fn play(&self, surface: Surface) -> cleancap_core::Result<()> {
        debug!("Playing {:?}", surface);
        Ok(())
    }

    fn alert(&self, notice: &Notice) {
        self.remember_offer(notice);
        eprintln!("! {}", notice.message);
        for action in &notice.actions {
            eprintln!("  - {}", action.label());
        }
    }
}

/// What a line of terminal input asks for
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Dispatch(Command),
    Quit,
    Unknown,
}

fn parse_input(line: &str, grid: &[String], panel: SettingsPanel) -> Input {
    match line {
        "q" | "quit" | "exit" => Input::Quit,
        "c" => Input::Dispatch(Command::ToggleCamera),
        "r" => Input::Dispatch(Command::Retry),
        "s" => Input::Dispatch(Command::OpenSettings(panel)),
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 && n <= grid.len() => {
                Input::Dispatch(Command::Select(grid[n - 1].clone()))
            }
            _ => Input::Unknown,
        },
    }
}

fn report(result: &Dispatched) {
    match result {
        Dispatched::Share(ShareOutcome::Active(tier)) => {
            println!("Sharing ({:?} capture).", tier)
        }
        Dispatched::Share(ShareOutcome::Failed { denied, .. }) => {
            if *denied {
                println!("Sharing was denied. Press 's' for settings or 'r' to retry.");
            } else {
                println!("Sharing failed. Press 'r' to retry.");
            }
        }
        Dispatched::Grid(n) => println!("{} sources. Enter a number to share.", n),
        Dispatched::Remediation(_) => println!("Press 'r' to retry or 's' for settings."),
        Dispatched::Camera(CameraOutcome::Failed(_)) => println!("Camera unavailable."),
        Dispatched::Camera(outcome) => debug!("Camera: {:?}", outcome),
        Dispatched::SettingsOpened(false) => println!("No settings panel on this platform."),
        Dispatched::SettingsOpened(true) => {}
        Dispatched::TornDown(TeardownReport {
            screen_tracks,
            camera_tracks,
        }) => println!(
            "Stopped {} screen and {} camera tracks.",
            screen_tracks, camera_tracks
        ),
    }
}

/// Run the interactive share loop
pub async fn share(args: ShareArgs, config: ConfigFile) -> Result<()> {
    println!("Clean Capture - Share\n");

    let host = Arc::new(SystemHost::new());
    let view = Arc::new(TerminalView::default());
    let mut app = App::new(host.clone(), host, view.clone(), config);

    let first = match args.source {
        Some(id) => Command::Select(id),
        None => Command::Bootstrap,
    };
    report(&app.dispatch(first).await);

    if args.camera {
        report(&app.dispatch(Command::ToggleCamera).await);
    }

    println!("Keys: number = share source, c = camera, r = retry, s = settings, q = quit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = signal::ctrl_c() => {
                println!("\nReceived interrupt signal...");
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };

        match parse_input(line.trim(), &view.grid_ids(), view.settings_panel()) {
            Input::Dispatch(command) => report(&app.dispatch(command).await),
            Input::Quit => break,
            Input::Unknown => println!("Unknown input '{}'", line.trim()),
        }
    }

    report(&app.dispatch(Command::Teardown).await);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: SettingsPanel = SettingsPanel::ScreenCapture;

    fn grid() -> Vec<String> {
        vec!["screen:0".to_string(), "window:1".to_string()]
    }

    #[test]
    fn test_number_selects_grid_entry() {
        assert_eq!(
            parse_input("2", &grid(), SCREEN),
            Input::Dispatch(Command::Select("window:1".to_string()))
        );
    }

    #[test]
    fn test_out_of_range_number_is_unknown() {
        assert_eq!(parse_input("0", &grid(), SCREEN), Input::Unknown);
        assert_eq!(parse_input("3", &grid(), SCREEN), Input::Unknown);
        assert_eq!(parse_input("1", &[], SCREEN), Input::Unknown);
    }

    #[test]
    fn test_letter_commands() {
        assert_eq!(parse_input("c", &[], SCREEN), Input::Dispatch(Command::ToggleCamera));
        assert_eq!(parse_input("r", &[], SCREEN), Input::Dispatch(Command::Retry));
        assert_eq!(
            parse_input("s", &[], SettingsPanel::Camera),
            Input::Dispatch(Command::OpenSettings(SettingsPanel::Camera))
        );
        assert_eq!(parse_input("q", &[], SCREEN), Input::Quit);
    }

    #[test]
    fn test_grid_cleared_by_remediation() {
        let view = TerminalView::default();
        view.render_grid(&[CaptureSource::screen("screen:0", "Display 1")]);
        assert_eq!(view.grid_ids(), ["screen:0"]);
        view.render_remediation(&Notice::new("Screen recording permission required."));
        assert!(view.grid_ids().is_empty());
    }

    #[test]
    fn test_settings_key_follows_last_offer() {
        let view = TerminalView::default();
        assert_eq!(view.settings_panel(), SettingsPanel::ScreenCapture);

        view.alert(&Notice::camera_denied());
        assert_eq!(view.settings_panel(), SettingsPanel::Camera);

        view.alert(&Notice::camera_failed());
        assert_eq!(view.settings_panel(), SettingsPanel::Camera);

        view.render_remediation(&Notice::permission_required(None));
        assert_eq!(view.settings_panel(), SettingsPanel::ScreenCapture);
    }
}
