//! Opening and decoding files into `rodio` sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, Sink, Source, mixer::Mixer};

use crate::playback::EngineError;

/// Decode `path` into a paused `Sink` on `mixer`, starting `start_at` into
/// the file. Returns the sink and the decoder's idea of the track length.
pub(super) fn create_sink_at(
    mixer: &Mixer,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let duration = decoder.total_duration();

    let sink = Sink::connect_new(mixer);
    sink.set_volume(volume);
    // `skip_duration` doubles as a seek for sources that can't `try_seek`.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, duration))
}
