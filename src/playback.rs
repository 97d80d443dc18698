//! Playback core: playlist navigation, the transport state machine and
//! progress synchronization, all behind the `AudioEngine` trait.
//!
//! Everything here runs on the caller's thread. The UI drives it through
//! `MediaPlayer` and listens to `PlayerEvent`s.

mod controller;
mod engine;
mod error;
mod events;
mod media_player;
mod playlist;
mod progress;

pub use controller::{PlaybackController, PlayerOptions, TransportState};
pub use engine::AudioEngine;
pub use error::{EngineError, PlayerError, Result};
pub use events::PlayerEvent;
pub use media_player::MediaPlayer;
pub use playlist::Playlist;
pub use progress::{DragSession, ProgressSynchronizer};

#[cfg(test)]
pub(crate) mod fake_engine;
