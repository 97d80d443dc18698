use std::time::Duration;

use super::view::ViewState;
use crate::playback::{PlayerEvent, TransportState};

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("track {i}")).collect()
}

#[test]
fn track_change_moves_cursor_and_resets_progress() {
    let mut v = ViewState::new(1.0, true);
    v.apply(PlayerEvent::PlaylistChanged(names(3)));
    v.elapsed = Duration::from_secs(40);
    v.apply(PlayerEvent::TrackChanged {
        index: 2,
        display: "track 2".into(),
        duration: Some(Duration::from_secs(200)),
    });
    assert_eq!(v.cursor, 2);
    assert_eq!(v.loaded_index, Some(2));
    assert_eq!(v.elapsed, Duration::ZERO);
    assert_eq!(v.duration, Some(Duration::from_secs(200)));
    assert_eq!(v.now_playing.as_deref(), Some("track 2"));
}

#[test]
fn shrinking_playlist_clamps_cursor() {
    let mut v = ViewState::new(1.0, true);
    v.apply(PlayerEvent::PlaylistChanged(names(5)));
    v.cursor = 4;
    v.apply(PlayerEvent::PlaylistChanged(names(2)));
    assert_eq!(v.cursor, 1);
    v.apply(PlayerEvent::PlaylistChanged(Vec::new()));
    assert_eq!(v.cursor, 0);
}

#[test]
fn cursor_stays_in_bounds() {
    let mut v = ViewState::new(1.0, true);
    v.apply(PlayerEvent::PlaylistChanged(names(2)));
    v.cursor_up();
    assert_eq!(v.cursor, 0);
    v.cursor_down();
    v.cursor_down();
    assert_eq!(v.cursor, 1);
}

#[test]
fn stopping_forgets_loaded_index() {
    let mut v = ViewState::new(1.0, true);
    v.apply(PlayerEvent::PlaylistChanged(names(2)));
    v.apply(PlayerEvent::TrackChanged {
        index: 1,
        display: "track 1".into(),
        duration: None,
    });
    v.apply(PlayerEvent::TransportChanged(TransportState::Playing));
    assert_eq!(v.loaded_index, Some(1));
    v.apply(PlayerEvent::TransportChanged(TransportState::Stopped));
    assert_eq!(v.loaded_index, None);
    assert_eq!(v.transport, TransportState::Stopped);
}

#[test]
fn progress_keeps_known_duration_when_update_has_none() {
    let mut v = ViewState::new(1.0, true);
    v.apply(PlayerEvent::PlaylistChanged(names(1)));
    v.apply(PlayerEvent::TrackChanged {
        index: 0,
        display: "track 0".into(),
        duration: Some(Duration::from_secs(180)),
    });
    v.apply(PlayerEvent::ProgressUpdated {
        elapsed: Duration::from_secs(90),
        duration: None,
    });
    assert_eq!(v.duration, Some(Duration::from_secs(180)));
    assert!((v.ratio() - 0.5).abs() < 1e-9);
}

#[test]
fn ratio_is_zero_without_duration() {
    let mut v = ViewState::new(1.0, true);
    v.elapsed = Duration::from_secs(10);
    assert_eq!(v.ratio(), 0.0);
}
