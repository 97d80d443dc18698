//! Error types for the playback core and the engines behind it.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures reported by an `AudioEngine`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("failed to probe {path:?}: {reason}")]
    Probe { path: PathBuf, reason: String },

    #[error("audio engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("audio engine unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the playback controller.
///
/// None of these are fatal once the player is running: each one is also
/// published as a status message.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Playlist is empty")]
    EmptyPlaylist,

    #[error("Index {index} out of range for playlist of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Could not load {}: {source}", display_path(.path))]
    Load {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("Audio engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Audio engine error: {0}")]
    Engine(EngineError),
}

impl From<EngineError> for PlayerError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Unavailable(reason) => PlayerError::EngineUnavailable(reason),
            other => PlayerError::Engine(other),
        }
    }
}

fn display_path(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub type Result<T> = std::result::Result<T, PlayerError>;
