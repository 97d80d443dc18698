use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink, mixer::Mixer};

use crate::playback::EngineError;

use super::sink::create_sink_at;
use super::types::{AudioCmd, StatusHandle};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything the audio thread owns besides the output stream.
struct Deck {
    sink: Option<Sink>,
    path: Option<PathBuf>,
    duration: Option<Duration>,
    /// Offset of a sink that was rebuilt with `skip_duration`; its own clock
    /// starts at zero.
    base: Duration,
    paused: bool,
    volume: f32,
}

impl Deck {
    fn new() -> Self {
        Self {
            sink: None,
            path: None,
            duration: None,
            base: Duration::ZERO,
            paused: true,
            volume: 1.0,
        }
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.base + s.get_pos())
    }

    fn load(&mut self, mixer: &Mixer, path: PathBuf) -> Result<Option<Duration>, EngineError> {
        self.unload();
        let (sink, duration) = create_sink_at(mixer, &path, Duration::ZERO, self.volume)?;
        tracing::debug!("loaded {:?} ({:?})", path, duration);
        self.sink = Some(sink);
        self.path = Some(path);
        self.duration = duration;
        self.base = Duration::ZERO;
        self.paused = true;
        Ok(duration)
    }

    fn unload(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.path = None;
        self.duration = None;
        self.base = Duration::ZERO;
        self.paused = true;
    }

    fn play(&mut self, mixer: &Mixer, from_start: bool) {
        if from_start && self.position() > Duration::ZERO {
            self.seek(mixer, Duration::ZERO);
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
            self.paused = false;
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
            self.paused = true;
        }
    }

    fn seek(&mut self, mixer: &Mixer, target: Duration) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        // A rebuilt sink's clock is relative, so keep rebuilding for it.
        if self.base.is_zero() {
            match sink.try_seek(target) {
                Ok(()) => return,
                Err(e) => tracing::debug!("try_seek failed, rebuilding sink: {e:?}"),
            }
        }
        let Some(path) = self.path.clone() else {
            return;
        };
        self.rebuild_at(mixer, &path, target);
    }

    /// Replace the sink with a fresh decode skipped to `target`.
    fn rebuild_at(&mut self, mixer: &Mixer, path: &Path, target: Duration) {
        match create_sink_at(mixer, path, target, self.volume) {
            Ok((sink, _)) => {
                if let Some(old) = self.sink.take() {
                    old.stop();
                }
                if !self.paused {
                    sink.play();
                }
                self.sink = Some(sink);
                self.base = target;
            }
            Err(e) => tracing::warn!("seek rebuild failed: {e}"),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn publish(&self, status: &StatusHandle) {
        if let Ok(mut st) = status.lock() {
            st.path = self.path.clone();
            st.duration = self.duration;
            st.position = self.position();
            st.playing = self
                .sink
                .as_ref()
                .is_some_and(|s| !self.paused && !s.empty());
        }
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

/// Spawn the thread that owns the output stream. `ready` receives the
/// outcome of opening the default device before any command is handled.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    status: StatusHandle,
    ready: Sender<Result<(), EngineError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(EngineError::Unavailable(format!(
                    "no audio output device: {e}"
                ))));
                return;
            }
        };
        // rodio logs to stderr when the stream is dropped, which would
        // scribble over the terminal UI.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mixer = stream.mixer();
        let mut deck = Deck::new();

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCmd::Load { path, reply }) => {
                    let result = deck.load(mixer, path);
                    deck.publish(&status);
                    let _ = reply.send(result);
                    continue;
                }
                Ok(AudioCmd::Play { from_start }) => deck.play(mixer, from_start),
                Ok(AudioCmd::Pause) => deck.pause(),
                Ok(AudioCmd::Resume) => deck.play(mixer, false),
                Ok(AudioCmd::Stop) => deck.unload(),
                Ok(AudioCmd::Seek(target)) => deck.seek(mixer, target),
                Ok(AudioCmd::SetVolume(v)) => deck.set_volume(v),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    if let Some(s) = deck.sink.as_ref() {
                        if !deck.paused {
                            fade_out_sink(s, deck.volume, fade_out_ms);
                        }
                    }
                    deck.unload();
                    deck.publish(&status);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            deck.publish(&status);
        }
    })
}
