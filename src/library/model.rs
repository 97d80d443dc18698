use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single playable item in the playlist.
///
/// Everything but the duration is fixed at construction. The duration is
/// only known once an engine has loaded the file, so it lives in a set-once
/// cell that the controller fills on first load.
#[derive(Clone, Debug)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub display: String,
    duration: OnceCell<Duration>,
}

impl Track {
    pub fn new(
        path: PathBuf,
        title: String,
        artist: Option<String>,
        album: Option<String>,
        display: String,
    ) -> Self {
        Self {
            path,
            title,
            artist,
            album,
            display,
            duration: OnceCell::new(),
        }
    }

    /// Build a track with no tag metadata; title and display are the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stem = file_stem_or_unknown(&path);
        Self::new(path, stem.clone(), None, None, stem)
    }

    /// Cached duration, if the track has been loaded before.
    pub fn duration(&self) -> Option<Duration> {
        self.duration.get().copied()
    }

    /// Remember the duration reported for this track. The first value wins.
    pub fn cache_duration(&self, duration: Duration) {
        let _ = self.duration.set(duration);
    }
}

pub(crate) fn file_stem_or_unknown(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}
