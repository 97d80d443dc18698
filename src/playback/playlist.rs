//! Ordered track list with a wrapping current-track pointer.

use crate::library::Track;

use super::error::{PlayerError, Result};

/// Invariant: `current < tracks.len()` whenever the list is non-empty,
/// and `current == 0` when it is empty.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: usize,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Add at the end. Never moves the pointer.
    pub fn append(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.extend(tracks);
    }

    /// `None` while empty.
    pub fn current_index(&self) -> Option<usize> {
        (!self.tracks.is_empty()).then_some(self.current)
    }

    pub fn current(&self) -> Result<&Track> {
        self.tracks
            .get(self.current)
            .ok_or(PlayerError::EmptyPlaylist)
    }

    /// Step forward, wrapping past the end. No-op when empty.
    pub fn next(&mut self) {
        if !self.tracks.is_empty() {
            self.current = (self.current + 1) % self.tracks.len();
        }
    }

    /// Step back, wrapping past the start. No-op when empty.
    pub fn previous(&mut self) {
        if !self.tracks.is_empty() {
            let len = self.tracks.len();
            self.current = (self.current + len - 1) % len;
        }
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.current = index;
        Ok(())
    }

    /// Remove the track at `index` and keep the pointer on a valid slot.
    ///
    /// Tracks after the pointer don't affect it; removing one before it
    /// shifts it down; removing the current track leaves the pointer on the
    /// same slot, clamped to the new end.
    pub fn remove(&mut self, index: usize) -> Result<Track> {
        self.check(index)?;
        let track = self.tracks.remove(index);
        if index < self.current {
            self.current -= 1;
        }
        if self.current >= self.tracks.len() {
            self.current = self.tracks.len().saturating_sub(1);
        }
        Ok(track)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = 0;
    }

    pub fn display_names(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.display.clone()).collect()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.tracks.len() {
            Ok(())
        } else {
            Err(PlayerError::IndexOutOfRange {
                index,
                len: self.tracks.len(),
            })
        }
    }
}
