use std::path::Path;
use std::time::Duration;

use super::error::EngineError;

/// The narrow interface the playback core drives.
///
/// Mutating operations take `&mut self` and are only ever called by the
/// `PlaybackController`; queries take `&self` so the progress poll can run
/// against a shared borrow.
pub trait AudioEngine {
    /// Open and decode `path`, replacing whatever was loaded. Leaves the new
    /// track paused at its start.
    fn load(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Start the loaded track, from zero when `from_start` is set.
    fn play(&mut self, from_start: bool) -> Result<(), EngineError>;

    fn pause(&mut self) -> Result<(), EngineError>;

    /// Continue from the exact position `pause` left off at.
    fn resume(&mut self) -> Result<(), EngineError>;

    /// Stop and unload.
    fn stop(&mut self) -> Result<(), EngineError>;

    fn seek(&mut self, position: Duration) -> Result<(), EngineError>;

    /// `volume` is already clamped to `0.0..=1.0` by the caller.
    fn set_volume(&mut self, volume: f32) -> Result<(), EngineError>;

    /// True while audio is actually being produced.
    fn is_busy(&self) -> Result<bool, EngineError>;

    /// Position within the loaded track.
    fn position(&self) -> Result<Duration, EngineError>;

    /// Length of `path`, if it can be determined. Engines may only know this
    /// once the track has been loaded.
    fn duration(&self, path: &Path) -> Result<Option<Duration>, EngineError>;
}
