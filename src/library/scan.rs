use std::path::{Path, PathBuf};

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::{Track, file_stem_or_unknown};

/// Configured extensions, lower-cased and without a leading dot.
fn wanted_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn has_extension(path: &Path, wanted: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    wanted.iter().any(|w| w.eq_ignore_ascii_case(ext))
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    has_extension(path, &wanted_extensions(settings))
}

fn is_dot_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Build a `Track` for a single file, reading tags when the file has any.
///
/// Unreadable or untagged files still produce a track named after the file
/// stem; whether it actually decodes is the engine's problem at load time.
pub fn read_track(path: &Path, settings: &LibrarySettings) -> Track {
    let mut title = file_stem_or_unknown(path);
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;

    if let Ok(tagged) = lofty::read_from_path(path) {
        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = non_empty(tag.title()) {
                title = v;
            }
            artist = non_empty(tag.artist());
            album = non_empty(tag.album());
        }
    }

    let display = display_from_fields(
        path,
        &title,
        artist.as_deref(),
        album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );

    Track::new(path.to_path_buf(), title, artist, album, display)
}

fn walker(dir: &Path, settings: &LibrarySettings) -> WalkDir {
    let walker = WalkDir::new(dir).follow_links(settings.follow_links);
    match (settings.recursive, settings.max_depth) {
        (false, _) => walker.max_depth(1),
        (true, Some(depth)) => walker.max_depth(depth),
        (true, None) => walker,
    }
}

/// Walk `dir` and return every audio file in it, sorted by display name.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let wanted = wanted_extensions(settings);
    let mut tracks: Vec<Track> = walker(dir, settings)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || settings.include_hidden || !is_dot_file(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), &wanted))
        .map(|e| read_track(e.path(), settings))
        .collect();

    tracks.sort_by_cached_key(|t| t.display.to_lowercase());
    tracing::debug!("scanned {} track(s) in {:?}", tracks.len(), dir);
    tracks
}

/// Resolve a mix of files and directories into tracks.
///
/// Explicit files keep the order they were given in; each directory
/// contributes its own sorted scan at its position in `paths`.
pub fn collect(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks = Vec::new();
    for path in paths {
        if path.is_dir() {
            tracks.extend(scan(path, settings));
        } else if path.is_file() && is_audio_file(path, settings) {
            tracks.push(read_track(path, settings));
        } else {
            tracing::debug!("skipping non-audio path {:?}", path);
        }
    }
    tracks
}
