//! Integration tests for the command dispatcher

mod mocks;

use cleancap_core::app::{Command, Dispatched};
use cleancap_core::platform::SettingsPanel;
use cleancap_core::session::{CameraOutcome, ScreenState, ShareOutcome, Tier};
use cleancap_core::types::CaptureSource;
use mocks::{finder_and_display, Event, Harness, Requested, Scripted, ViewEvent};

#[tokio::test]
async fn test_bootstrap_auto_selects_single_screen() {
    let h = Harness::new(finder_and_display());
    let mut app = h.app();

    let result = app.dispatch(Command::Bootstrap).await;

    assert_eq!(result, Dispatched::Share(ShareOutcome::Active(Tier::Direct)));
    assert!(h.view.grids().is_empty());
    assert_eq!(app.screen_state(), ScreenState::Active);
    assert_eq!(
        h.count(|e| *e == Event::GetUserMedia(Requested::Desktop("screen:0".to_string()))),
        1
    );
}

#[tokio::test]
async fn test_bootstrap_shows_grid_then_selection_shares() {
    let h = Harness::new(vec![
        CaptureSource::window("window:1", "Finder"),
        CaptureSource::screen("screen:0", "Display 1"),
        CaptureSource::screen("screen:1", "Display 2"),
    ]);
    let mut app = h.app();

    assert_eq!(app.dispatch(Command::Bootstrap).await, Dispatched::Grid(3));
    assert_eq!(
        h.view.grids(),
        vec![vec![
            "Display 1".to_string(),
            "Display 2".to_string(),
            "Finder".to_string()
        ]]
    );
    assert!(h.view.events().contains(&ViewEvent::Picker(true)));
    assert_eq!(app.screen_state(), ScreenState::Selecting);

    let result = app.dispatch(Command::Select("screen:1".to_string())).await;

    assert_eq!(result, Dispatched::Share(ShareOutcome::Active(Tier::Direct)));
    assert!(app.directory().current().is_empty());
    assert_eq!(
        h.view.events().first(),
        Some(&ViewEvent::Grid(vec![
            "Display 1".to_string(),
            "Display 2".to_string(),
            "Finder".to_string()
        ]))
    );
}

#[tokio::test]
async fn test_no_sources_shows_remediation_with_statuses() {
    let h = Harness::new(vec![]);
    let mut app = h.app();

    let Dispatched::Remediation(notice) = app.dispatch(Command::Bootstrap).await else {
        panic!("expected remediation panel");
    };

    assert_eq!(
        notice.message,
        "Screen recording permission required. Camera: granted, Microphone: not-determined."
    );
    assert!(notice.offers_settings());
    assert_eq!(app.screen_state(), ScreenState::Error);
    assert!(h.view.events().contains(&ViewEvent::Remediation(notice)));
}

#[tokio::test]
async fn test_enumeration_error_shows_remediation() {
    let h = Harness::new(vec![]);
    h.host.fail_listing("desktop capturer crashed");
    let mut app = h.app();

    assert!(matches!(
        app.dispatch(Command::Bootstrap).await,
        Dispatched::Remediation(_)
    ));
}

#[tokio::test]
async fn test_retry_after_permission_granted() {
    let h = Harness::new(vec![]);
    let mut app = h.app();
    app.dispatch(Command::Bootstrap).await;

    h.host.set_sources(vec![CaptureSource::screen("screen:0", "Display 1")]);
    let result = app.dispatch(Command::Retry).await;

    assert_eq!(result, Dispatched::Share(ShareOutcome::Active(Tier::Direct)));
    assert_eq!(app.screen_state(), ScreenState::Active);
}

#[tokio::test]
async fn test_refresh_while_active_replaces_stream() {
    let h = Harness::new(finder_and_display());
    let mut app = h.app();
    app.dispatch(Command::Bootstrap).await;
    app.dispatch(Command::Refresh).await;

    let tracks = h.media.tracks();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].stop_count(), 1);
    assert_eq!(tracks[1].stop_count(), 0);
}

#[tokio::test]
async fn test_open_settings_command() {
    let h = Harness::new(vec![]);
    let mut app = h.app();

    assert_eq!(
        app.dispatch(Command::OpenSettings(SettingsPanel::ScreenCapture)).await,
        Dispatched::SettingsOpened(true)
    );
    assert_eq!(
        h.count(|e| *e == Event::OpenSettings(SettingsPanel::ScreenCapture)),
        1
    );
}

#[tokio::test]
async fn test_camera_denial_offers_camera_panel() {
    let h = Harness::new(finder_and_display());
    let mut app = h.app();
    h.media.script_user_media(Scripted::Denied);

    let Dispatched::Camera(CameraOutcome::Failed(notice)) =
        app.dispatch(Command::ToggleCamera).await
    else {
        panic!("expected camera failure");
    };
    let panel = notice.settings_panel().expect("camera notice offers settings");
    assert_eq!(panel, SettingsPanel::Camera);

    assert_eq!(
        app.dispatch(Command::OpenSettings(panel)).await,
        Dispatched::SettingsOpened(true)
    );
    assert_eq!(h.count(|e| *e == Event::OpenSettings(SettingsPanel::Camera)), 1);
    assert_eq!(
        h.count(|e| *e == Event::OpenSettings(SettingsPanel::ScreenCapture)),
        0
    );
}

#[tokio::test]
async fn test_toggle_camera_and_teardown() {
    let h = Harness::new(finder_and_display());
    let mut app = h.app();
    h.media.script_user_media(Scripted::Video(1));
    h.media.script_user_media(Scripted::Video(1));

    app.dispatch(Command::Bootstrap).await;
    assert_eq!(
        app.dispatch(Command::ToggleCamera).await,
        Dispatched::Camera(CameraOutcome::Started)
    );

    let Dispatched::TornDown(report) = app.dispatch(Command::Teardown).await else {
        panic!("expected teardown report");
    };
    assert_eq!(report.screen_tracks, 1);
    assert_eq!(report.camera_tracks, 1);

    drop(app);
    for track in h.media.tracks() {
        assert_eq!(track.stop_count(), 1);
    }
}
