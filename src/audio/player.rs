use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use lofty::prelude::*;

use crate::config::AudioSettings;
use crate::playback::{AudioEngine, EngineError};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, EngineStatus, StatusHandle};

/// `AudioEngine` backed by a rodio output stream on its own thread.
///
/// Commands are fire-and-forget except `load`, which waits for the decoder
/// up to the configured timeout. Queries read a status snapshot the thread
/// refreshes on every command and poll interval.
pub struct RodioEngine {
    tx: Sender<AudioCmd>,
    status: StatusHandle,
    load_timeout: Duration,
    join: Option<JoinHandle<()>>,
}

impl RodioEngine {
    pub fn new(settings: &AudioSettings) -> Result<Self, EngineError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let status: StatusHandle = Arc::new(Mutex::new(EngineStatus::default()));

        let join = spawn_audio_thread(rx, status.clone(), ready_tx);
        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = join.join();
                return Err(e);
            }
            Err(_) => {
                return Err(EngineError::Unavailable(
                    "audio thread exited during startup".to_string(),
                ));
            }
        }
        tracing::info!("audio output opened");

        Ok(Self {
            tx,
            status,
            load_timeout: Duration::from_millis(settings.load_timeout_ms),
            join: Some(join),
        })
    }

    /// Fade out, stop the audio thread and wait for it.
    pub fn quit_softly(mut self, fade_out: Duration) {
        let _ = self.tx.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), EngineError> {
        self.tx
            .send(cmd)
            .map_err(|_| EngineError::Unavailable("audio thread has exited".to_string()))
    }

    fn status(&self) -> Result<MutexGuard<'_, EngineStatus>, EngineError> {
        self.status
            .lock()
            .map_err(|_| EngineError::Unavailable("audio status poisoned".to_string()))
    }
}

/// Read the length from the file's tags. Zero means the format didn't say.
fn probe_duration(path: &Path) -> Result<Option<Duration>, EngineError> {
    let tagged = lofty::read_from_path(path).map_err(|e| EngineError::Probe {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let duration = tagged.properties().duration();
    Ok((!duration.is_zero()).then_some(duration))
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(AudioCmd::Load {
            path: path.to_path_buf(),
            reply: reply_tx,
        })?;
        match reply_rx.recv_timeout(self.load_timeout) {
            Ok(result) => result.map(|_| ()),
            Err(RecvTimeoutError::Timeout) => Err(EngineError::Timeout(self.load_timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Unavailable(
                "audio thread dropped the load request".to_string(),
            )),
        }
    }

    fn play(&mut self, from_start: bool) -> Result<(), EngineError> {
        self.send(AudioCmd::Play { from_start })?;
        // Don't let a poll that lands before the thread wakes up read the
        // old "idle" snapshot as the end of the track.
        let mut st = self.status()?;
        if st.path.is_some() {
            st.playing = true;
            if from_start {
                st.position = Duration::ZERO;
            }
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.send(AudioCmd::Pause)?;
        self.status()?.playing = false;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.send(AudioCmd::Resume)?;
        let mut st = self.status()?;
        if st.path.is_some() {
            st.playing = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.send(AudioCmd::Stop)?;
        *self.status()? = EngineStatus::default();
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        self.send(AudioCmd::Seek(position))?;
        self.status()?.position = position;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), EngineError> {
        self.send(AudioCmd::SetVolume(volume))
    }

    fn is_busy(&self) -> Result<bool, EngineError> {
        Ok(self.status()?.playing)
    }

    fn position(&self) -> Result<Duration, EngineError> {
        Ok(self.status()?.position)
    }

    fn duration(&self, path: &Path) -> Result<Option<Duration>, EngineError> {
        {
            let st = self.status()?;
            if st.path.as_deref() == Some(path) && st.duration.is_some() {
                return Ok(st.duration);
            }
        }
        probe_duration(path)
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        if let Some(h) = self.join.take() {
            let _ = self.tx.send(AudioCmd::Quit { fade_out_ms: 0 });
            let _ = h.join();
        }
    }
}
