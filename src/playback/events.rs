//! Typed notifications from the playback core to whoever draws it.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use super::TransportState;

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Human-readable status line ("Playing: x", "Music Paused", errors).
    StatusChanged(String),
    /// A new track was loaded and started.
    TrackChanged {
        index: usize,
        display: String,
        duration: Option<Duration>,
    },
    /// The progress indicator should show `elapsed`.
    ProgressUpdated {
        elapsed: Duration,
        duration: Option<Duration>,
    },
    /// Playlist contents changed; carries every display name in order.
    PlaylistChanged(Vec<String>),
    TransportChanged(TransportState),
    VolumeChanged(f32),
}

/// Fan-out of `PlayerEvent`s to any number of channel subscribers.
///
/// Subscribers that dropped their receiver are pruned on the next emit.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<PlayerEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
