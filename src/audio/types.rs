//! Commands and shared state between the engine handle and its audio thread.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::playback::EngineError;

#[derive(Debug)]
pub enum AudioCmd {
    /// Decode `path` into a fresh paused sink, replying with its length if
    /// the decoder knows it.
    Load {
        path: PathBuf,
        reply: Sender<Result<Option<Duration>, EngineError>>,
    },
    /// Start or continue the loaded sink, rewinding first when `from_start`.
    Play { from_start: bool },
    Pause,
    Resume,
    /// Drop the current sink.
    Stop,
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Snapshot of the audio thread's state, refreshed on every command and
/// every poll interval.
#[derive(Debug, Clone, Default)]
pub struct EngineStatus {
    pub path: Option<PathBuf>,
    /// Length reported by the decoder of the loaded track.
    pub duration: Option<Duration>,
    pub position: Duration,
    /// Audio is actually coming out: loaded, not paused, not drained.
    pub playing: bool,
}

pub type StatusHandle = Arc<Mutex<EngineStatus>>;
