use std::time::Duration;

use crate::playback::{PlayerEvent, TransportState};

/// What the terminal shows, rebuilt from `PlayerEvent`s plus a little
/// UI-only state (cursor, panels, prompt).
#[derive(Debug, Clone)]
pub struct ViewState {
    pub status: String,
    pub now_playing: Option<String>,
    pub loaded_index: Option<usize>,
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    pub playlist: Vec<String>,
    pub cursor: usize,
    pub volume: f32,
    pub transport: TransportState,
    pub show_playlist: bool,
    /// Text of the "add path" prompt while it is open.
    pub prompt: Option<String>,
}

impl ViewState {
    pub fn new(volume: f32, show_playlist: bool) -> Self {
        Self {
            status: "Ready".to_string(),
            now_playing: None,
            loaded_index: None,
            elapsed: Duration::ZERO,
            duration: None,
            playlist: Vec::new(),
            cursor: 0,
            volume,
            transport: TransportState::Stopped,
            show_playlist,
            prompt: None,
        }
    }

    pub fn apply(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::StatusChanged(s) => self.status = s,
            PlayerEvent::TrackChanged {
                index,
                display,
                duration,
            } => {
                self.now_playing = Some(display);
                self.loaded_index = Some(index);
                self.duration = duration;
                self.elapsed = Duration::ZERO;
                self.cursor = index;
            }
            PlayerEvent::ProgressUpdated { elapsed, duration } => {
                self.elapsed = elapsed;
                if duration.is_some() || self.loaded_index.is_none() {
                    self.duration = duration;
                }
            }
            PlayerEvent::PlaylistChanged(names) => {
                self.playlist = names;
                self.cursor = self.cursor.min(self.playlist.len().saturating_sub(1));
                if self.loaded_index.is_some_and(|i| i >= self.playlist.len()) {
                    self.loaded_index = None;
                }
            }
            PlayerEvent::TransportChanged(state) => {
                self.transport = state;
                if state == TransportState::Stopped {
                    self.loaded_index = None;
                }
            }
            PlayerEvent::VolumeChanged(v) => self.volume = v,
        }
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.playlist.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Fraction of the track already played, for the gauge.
    pub fn ratio(&self) -> f64 {
        match self.duration {
            Some(d) if !d.is_zero() => {
                (self.elapsed.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
