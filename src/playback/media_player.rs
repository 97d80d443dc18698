use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::library::Track;

use super::controller::{PlaybackController, PlayerOptions};
use super::engine::AudioEngine;
use super::error::Result;
use super::events::PlayerEvent;
use super::progress::ProgressSynchronizer;

/// The command surface a UI drives: transport, playlist, volume, drags and
/// the periodic progress tick, all on one thread.
pub struct MediaPlayer<E: AudioEngine> {
    controller: PlaybackController<E>,
    progress: ProgressSynchronizer,
}

impl<E: AudioEngine> MediaPlayer<E> {
    pub fn new(engine: E, options: PlayerOptions) -> Self {
        Self {
            controller: PlaybackController::new(engine, options),
            progress: ProgressSynchronizer::new(),
        }
    }

    pub fn controller(&self) -> &PlaybackController<E> {
        &self.controller
    }

    pub fn progress(&self) -> &ProgressSynchronizer {
        &self.progress
    }

    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        self.controller.subscribe()
    }

    /// Hand the engine back, e.g. to shut its thread down.
    pub fn into_engine(self) -> E {
        self.controller.into_engine()
    }

    pub fn add_tracks(&mut self, tracks: Vec<Track>) {
        self.controller.add_tracks(tracks);
    }

    pub fn select_track(&mut self, index: usize) -> Result<()> {
        self.controller.select_track(index)
    }

    pub fn play_or_toggle(&mut self) -> Result<()> {
        self.controller.play_or_toggle()
    }

    pub fn next(&mut self) -> Result<()> {
        self.controller.next()
    }

    pub fn previous(&mut self) -> Result<()> {
        self.controller.previous()
    }

    pub fn stop(&mut self) -> Result<()> {
        self.controller.stop()
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.controller.set_volume(volume)
    }

    pub fn seek_to(&mut self, position: Duration) -> Result<()> {
        self.controller.seek_to(position)
    }

    pub fn remove_track(&mut self, index: usize) -> Result<()> {
        self.controller.remove_track(index)
    }

    pub fn clear_playlist(&mut self) {
        self.controller.clear_playlist();
    }

    pub fn begin_drag(&mut self) {
        self.progress.begin_drag(&self.controller);
    }

    pub fn cancel_drag(&mut self) {
        self.progress.cancel_drag();
    }

    pub fn drag_move(&mut self, position: Duration) {
        self.progress.drag_move(&mut self.controller, position);
    }

    pub fn end_drag(&mut self, position: Duration) -> Result<()> {
        self.progress.end_drag(&mut self.controller, position)
    }

    pub fn is_dragging(&self) -> bool {
        self.progress.drag().is_active()
    }

    /// The ~1 Hz progress poll.
    pub fn tick(&mut self) {
        self.progress.tick(&mut self.controller);
    }
}
