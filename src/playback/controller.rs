use std::time::Duration;

use crate::library::Track;

use super::engine::AudioEngine;
use super::error::{PlayerError, Result};
use super::events::{EventBus, PlayerEvent};
use super::playlist::Playlist;

/// Transport state as seen by the user.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Startup knobs for the controller.
#[derive(Debug, Clone, Copy)]
pub struct PlayerOptions {
    pub initial_volume: f32,
    /// Start the next track when the engine finishes one on its own.
    pub auto_advance: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            auto_advance: false,
        }
    }
}

/// Owns the playlist and transport state and is the only caller of the
/// engine's mutating operations.
///
/// Every failure is logged, published as a status message and returned, so
/// callers may inspect the result or ignore it.
pub struct PlaybackController<E: AudioEngine> {
    engine: E,
    playlist: Playlist,
    state: TransportState,
    /// Playlist index of the track the engine currently holds.
    loaded: Option<usize>,
    /// Bumped on every successful load.
    generation: u64,
    volume: f32,
    auto_advance: bool,
    events: EventBus,
}

pub(crate) fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

impl<E: AudioEngine> PlaybackController<E> {
    pub fn new(mut engine: E, options: PlayerOptions) -> Self {
        let volume = clamp_volume(options.initial_volume);
        if let Err(e) = engine.set_volume(volume) {
            tracing::warn!("could not apply initial volume: {e}");
        }

        Self {
            engine,
            playlist: Playlist::new(),
            state: TransportState::Stopped,
            loaded: None,
            generation: 0,
            volume,
            auto_advance: options.auto_advance,
            events: EventBus::default(),
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Read-only access for pollers. Mutating the engine goes through the
    /// controller's own operations.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn loaded_index(&self) -> Option<usize> {
        self.loaded
    }

    pub fn loaded_track(&self) -> Option<&Track> {
        self.loaded.and_then(|i| self.playlist.get(i))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn subscribe(&mut self) -> std::sync::mpsc::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    pub(crate) fn into_engine(self) -> E {
        self.engine
    }

    pub(crate) fn emit(&mut self, event: PlayerEvent) {
        self.events.emit(event);
    }

    /// Length of the loaded track: the cached value, else whatever the
    /// engine can tell now. Found durations are cached on the track.
    pub fn loaded_duration(&self) -> Option<Duration> {
        let track = self.loaded_track()?;
        if let Some(d) = track.duration() {
            return Some(d);
        }
        match self.engine.duration(&track.path) {
            Ok(Some(d)) => {
                track.cache_duration(d);
                Some(d)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("duration query failed for {:?}: {e}", track.path);
                None
            }
        }
    }

    pub fn add_tracks(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        tracing::info!("adding {} track(s)", tracks.len());
        self.playlist.extend(tracks);
        self.publish_playlist();
    }

    /// Play/pause toggle with a three-way decision, in this order:
    /// paused resumes, audible pauses, anything else (re)loads the current
    /// track from zero.
    ///
    /// `Paused` is checked first because engines tend to report "not busy"
    /// right after a pause, which would otherwise restart the track.
    pub fn play_or_toggle(&mut self) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(self.report(PlayerError::EmptyPlaylist));
        }

        if self.state == TransportState::Paused {
            return self.resume_loaded();
        }

        let busy = self.engine.is_busy().unwrap_or_else(|e| {
            tracing::warn!("busy query failed, assuming idle: {e}");
            false
        });
        if busy {
            return self.pause_loaded();
        }

        self.start_current()
    }

    pub fn next(&mut self) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(self.report(PlayerError::EmptyPlaylist));
        }
        self.playlist.next();
        self.start_current()
    }

    pub fn previous(&mut self) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(self.report(PlayerError::EmptyPlaylist));
        }
        self.playlist.previous();
        self.start_current()
    }

    /// Jump to `index` and play it from the start.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        if let Err(e) = self.playlist.select(index) {
            return Err(self.report(e));
        }
        self.start_current()
    }

    pub fn stop(&mut self) -> Result<()> {
        let result = self.engine.stop();
        self.unload();
        match result {
            Ok(()) => {
                self.emit(PlayerEvent::StatusChanged("Stopped".to_string()));
                Ok(())
            }
            Err(e) => Err(self.report(e.into())),
        }
    }

    /// Clamp to `0.0..=1.0` and apply right away, whatever the transport
    /// state. The stored volume changes even if the engine call fails.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        let volume = clamp_volume(volume);
        self.volume = volume;
        let result = self.engine.set_volume(volume);
        self.emit(PlayerEvent::VolumeChanged(volume));
        result.map_err(|e| self.report(e.into()))
    }

    /// Seek within the loaded track. A no-op when nothing is loaded, since
    /// sliders fire before the first track starts.
    pub fn seek_to(&mut self, position: Duration) -> Result<()> {
        if self.loaded.is_none() {
            tracing::debug!("seek to {:?} ignored, nothing loaded", position);
            return Ok(());
        }
        let position = match self.loaded_duration() {
            Some(d) => position.min(d),
            None => position,
        };
        tracing::debug!("seek to {:?}", position);
        self.engine
            .seek(position)
            .map_err(|e| self.report(e.into()))
    }

    /// The engine went idle on its own while we were playing.
    ///
    /// Stops by default; with auto-advance enabled moves on to the next
    /// track instead.
    pub fn handle_track_end(&mut self) -> Result<()> {
        if self.state != TransportState::Playing {
            return Ok(());
        }
        let Some(title) = self.loaded_track().map(|t| t.display.clone()) else {
            return Ok(());
        };
        tracing::info!("finished {}", title);

        if self.auto_advance {
            return self.next();
        }

        self.loaded = None;
        self.set_state(TransportState::Stopped);
        self.emit(PlayerEvent::StatusChanged(format!("Finished: {title}")));
        Ok(())
    }

    pub fn remove_track(&mut self, index: usize) -> Result<()> {
        let removed = match self.playlist.remove(index) {
            Ok(t) => t,
            Err(e) => return Err(self.report(e)),
        };
        tracing::info!("removed {}", removed.display);

        match self.loaded {
            Some(l) if l == index => {
                self.halt();
                self.emit(PlayerEvent::StatusChanged(format!(
                    "Removed: {}",
                    removed.display
                )));
            }
            Some(l) if index < l => self.loaded = Some(l - 1),
            _ => {}
        }
        if self.playlist.is_empty() {
            self.halt();
        }

        self.publish_playlist();
        Ok(())
    }

    pub fn clear_playlist(&mut self) {
        self.playlist.clear();
        self.halt();
        self.publish_playlist();
    }

    fn start_current(&mut self) -> Result<()> {
        let (index, path, title) = match self.playlist.current() {
            Ok(track) => (
                self.playlist.current_index().unwrap_or(0),
                track.path.clone(),
                track.display.clone(),
            ),
            Err(e) => return Err(self.report(e)),
        };

        let started = self
            .engine
            .load(&path)
            .and_then(|()| self.engine.play(true));
        if let Err(source) = started {
            self.halt();
            return Err(self.report(PlayerError::Load { path, source }));
        }

        self.loaded = Some(index);
        self.generation += 1;
        let duration = self.loaded_duration();
        tracing::info!("playing {} ({:?})", title, duration);

        self.set_state(TransportState::Playing);
        self.emit(PlayerEvent::TrackChanged {
            index,
            display: title.clone(),
            duration,
        });
        self.emit(PlayerEvent::ProgressUpdated {
            elapsed: Duration::ZERO,
            duration,
        });
        self.emit(PlayerEvent::StatusChanged(format!("Playing: {title}")));
        Ok(())
    }

    fn pause_loaded(&mut self) -> Result<()> {
        if let Err(e) = self.engine.pause() {
            return Err(self.report(e.into()));
        }
        self.set_state(TransportState::Paused);
        self.emit(PlayerEvent::StatusChanged("Music Paused".to_string()));
        Ok(())
    }

    fn resume_loaded(&mut self) -> Result<()> {
        if let Err(e) = self.engine.resume() {
            return Err(self.report(e.into()));
        }
        self.set_state(TransportState::Playing);
        let display = self
            .loaded_track()
            .map(|t| t.display.clone())
            .unwrap_or_default();
        self.emit(PlayerEvent::StatusChanged(format!("Playing: {display}")));
        Ok(())
    }

    /// Stop the engine without reporting, for paths that already explain
    /// themselves (failed load, removed track, cleared playlist).
    fn halt(&mut self) {
        if let Err(e) = self.engine.stop() {
            tracing::warn!("engine stop failed: {e}");
        }
        self.unload();
    }

    fn unload(&mut self) {
        self.loaded = None;
        self.set_state(TransportState::Stopped);
        self.emit(PlayerEvent::ProgressUpdated {
            elapsed: Duration::ZERO,
            duration: None,
        });
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state != state {
            tracing::debug!("transport {:?} -> {:?}", self.state, state);
            self.state = state;
            self.emit(PlayerEvent::TransportChanged(state));
        }
    }

    fn publish_playlist(&mut self) {
        let names = self.playlist.display_names();
        self.emit(PlayerEvent::PlaylistChanged(names));
    }

    fn report(&mut self, err: PlayerError) -> PlayerError {
        tracing::warn!("{err}");
        self.emit(PlayerEvent::StatusChanged(err.to_string()));
        err
    }
}
