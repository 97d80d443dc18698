//! Progress reconciliation between the polled engine clock and user drags.
//!
//! Two writers compete for the progress indicator: the periodic poll of the
//! engine position and the user scrubbing it. A `DragSession` decides who
//! wins. While a drag is active, ticks keep running but publish nothing; the
//! drag commits exactly one seek when it ends.

use std::time::Duration;

use super::controller::{PlaybackController, TransportState};
use super::engine::AudioEngine;
use super::error::Result;
use super::events::PlayerEvent;

#[derive(Debug, Default, Clone)]
pub struct DragSession {
    active: bool,
    pending: Option<Duration>,
    last_committed: Option<Duration>,
    /// Controller generation of the track being dragged.
    generation: u64,
}

impl DragSession {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Position the user is currently hovering, not yet sent to the engine.
    pub fn pending(&self) -> Option<Duration> {
        self.pending
    }

    pub fn last_committed(&self) -> Option<Duration> {
        self.last_committed
    }

    fn begin(&mut self, generation: u64) {
        self.active = true;
        self.pending = None;
        self.generation = generation;
    }

    fn cancel(&mut self) {
        self.active = false;
        self.pending = None;
    }

    fn finish(&mut self, position: Duration) {
        self.active = false;
        self.pending = None;
        self.last_committed = Some(position);
    }
}

#[derive(Debug, Default)]
pub struct ProgressSynchronizer {
    drag: DragSession,
    /// Last value sent to the display.
    published: Option<Duration>,
    duration: Option<Duration>,
    /// Controller generation the cached values belong to.
    generation: u64,
}

impl ProgressSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn displayed(&self) -> Option<Duration> {
        self.published
    }

    pub fn begin_drag<E: AudioEngine>(&mut self, controller: &PlaybackController<E>) {
        tracing::debug!("drag started");
        self.drag.begin(controller.generation());
    }

    /// Drop an open drag without seeking.
    pub fn cancel_drag(&mut self) {
        if self.drag.is_active() {
            tracing::debug!("drag cancelled");
            self.drag.cancel();
        }
    }

    /// A drag belongs to the track that was loaded when it began. Once that
    /// track is gone (stopped, removed or replaced) the drag is cancelled.
    /// Returns true if a drag is still open afterwards.
    fn drag_still_valid<E: AudioEngine>(&mut self, controller: &PlaybackController<E>) -> bool {
        if !self.drag.is_active() {
            return false;
        }
        if controller.loaded_index().is_none() || controller.generation() != self.drag.generation {
            self.cancel_drag();
            return false;
        }
        true
    }

    /// Track the pointer during a drag. The display follows it; the engine
    /// does not.
    pub fn drag_move<E: AudioEngine>(
        &mut self,
        controller: &mut PlaybackController<E>,
        position: Duration,
    ) {
        if !self.drag_still_valid(controller) {
            return;
        }
        let duration = controller.loaded_duration();
        let position = clamp_to(position, duration);
        self.drag.pending = Some(position);
        self.published = Some(position);
        controller.emit(PlayerEvent::ProgressUpdated {
            elapsed: position,
            duration,
        });
    }

    /// Release the drag and commit `position` with a single seek.
    ///
    /// Without a preceding `begin_drag` this behaves like a click on the bar.
    /// A drag whose track is no longer loaded ends without seeking.
    pub fn end_drag<E: AudioEngine>(
        &mut self,
        controller: &mut PlaybackController<E>,
        position: Duration,
    ) -> Result<()> {
        if self.drag.is_active() && !self.drag_still_valid(controller) {
            return Ok(());
        }
        let duration = controller.loaded_duration();
        let position = clamp_to(position, duration);
        self.drag.finish(position);

        let result = controller.seek_to(position);
        if controller.loaded_index().is_some() {
            self.published = Some(position);
            controller.emit(PlayerEvent::ProgressUpdated {
                elapsed: position,
                duration,
            });
        }
        result
    }

    /// One poll of the engine. Cheap and side-effect free while dragging;
    /// read failures just skip this tick.
    pub fn tick<E: AudioEngine>(&mut self, controller: &mut PlaybackController<E>) {
        if self.drag_still_valid(controller) {
            return;
        }

        if controller.generation() != self.generation {
            self.generation = controller.generation();
            self.published = None;
            self.duration = None;
        }

        if controller.loaded_index().is_none() {
            return;
        }

        let busy = match controller.engine().is_busy() {
            Ok(busy) => busy,
            Err(e) => {
                tracing::debug!("tick skipped: {e}");
                return;
            }
        };

        let duration = controller.loaded_duration();
        if duration != self.duration {
            tracing::debug!("track duration now {:?}", duration);
            self.duration = duration;
        }

        if !busy {
            if controller.state() == TransportState::Playing {
                if let Some(d) = duration {
                    self.publish(controller, d, duration);
                }
                if let Err(e) = controller.handle_track_end() {
                    tracing::debug!("track end handling failed: {e}");
                }
            }
            return;
        }

        let position = match controller.engine().position() {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!("tick skipped: {e}");
                return;
            }
        };
        self.publish(controller, clamp_to(position, duration), duration);
    }

    fn publish<E: AudioEngine>(
        &mut self,
        controller: &mut PlaybackController<E>,
        elapsed: Duration,
        duration: Option<Duration>,
    ) {
        if self.published == Some(elapsed) {
            return;
        }
        self.published = Some(elapsed);
        controller.emit(PlayerEvent::ProgressUpdated { elapsed, duration });
    }
}

fn clamp_to(position: Duration, duration: Option<Duration>) -> Duration {
    match duration {
        Some(d) => position.min(d),
        None => position,
    }
}
