use super::display::display_from_fields;
use super::model::Track;
use crate::config::TrackDisplayField;
use std::path::Path;
use std::time::Duration;

#[test]
fn display_from_fields_can_format_artist_title() {
    let p = Path::new("/tmp/Song.mp3");
    assert_eq!(
        display_from_fields(
            p,
            "Song",
            Some("  Artist  "),
            None,
            &[TrackDisplayField::Artist, TrackDisplayField::Title],
            " - ",
        ),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(
            p,
            "Song",
            None,
            None,
            &[TrackDisplayField::Artist, TrackDisplayField::Title],
            " - ",
        ),
        "Song"
    );
}

#[test]
fn display_from_fields_falls_back_to_title_when_nothing_matches() {
    let p = Path::new("/tmp/Song.mp3");
    assert_eq!(
        display_from_fields(p, "Fallback", None, None, &[TrackDisplayField::Album], "/"),
        "Fallback"
    );
    assert_eq!(
        display_from_fields(p, "x", None, None, &[TrackDisplayField::Filename], "/"),
        "Song"
    );
}

#[test]
fn track_duration_is_cached_once() {
    let track = Track::from_path("/music/intro.wav");
    assert_eq!(track.display, "intro");
    assert_eq!(track.duration(), None);

    track.cache_duration(Duration::from_secs(180));
    track.cache_duration(Duration::from_secs(1));
    assert_eq!(track.duration(), Some(Duration::from_secs(180)));

    // Clones carry the cached value with them.
    assert_eq!(track.clone().duration(), Some(Duration::from_secs(180)));
}
