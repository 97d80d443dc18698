//! Recording `AudioEngine` double shared by the playback and shell tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use super::{AudioEngine, EngineError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load(PathBuf),
    Play(bool),
    Pause,
    Resume,
    Stop,
    Seek(Duration),
    SetVolume(f32),
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub(crate) calls: Vec<Call>,
    pub(crate) loaded: Option<PathBuf>,
    pub(crate) busy: bool,
    pub(crate) position: Duration,
    pub(crate) durations: HashMap<PathBuf, Duration>,
    pub(crate) undecodable: HashSet<PathBuf>,
    pub(crate) unavailable: bool,
    pub(crate) queries_fail: bool,
}

/// Records every command and plays back whatever state the test sets.
#[derive(Clone, Default)]
pub(crate) struct FakeEngine(pub(crate) Rc<RefCell<FakeState>>);

impl FakeEngine {
    pub(crate) fn with_durations(durations: &[(&str, u64)]) -> Self {
        let engine = Self::default();
        engine.0.borrow_mut().durations = durations
            .iter()
            .map(|(p, secs)| (PathBuf::from(p), Duration::from_secs(*secs)))
            .collect();
        engine
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub(crate) fn seeks(&self) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Seek(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn set_position(&self, secs: u64) {
        self.0.borrow_mut().position = Duration::from_secs(secs);
    }

    pub(crate) fn set_busy(&self, busy: bool) {
        self.0.borrow_mut().busy = busy;
    }

    fn record(&self, call: Call) -> Result<(), EngineError> {
        let mut s = self.0.borrow_mut();
        s.calls.push(call);
        if s.unavailable {
            return Err(EngineError::Unavailable("device gone".into()));
        }
        Ok(())
    }
}

impl AudioEngine for FakeEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        self.record(Call::Load(path.to_path_buf()))?;
        let mut s = self.0.borrow_mut();
        if s.undecodable.contains(path) {
            return Err(EngineError::Decode {
                path: path.to_path_buf(),
                reason: "not audio".into(),
            });
        }
        s.loaded = Some(path.to_path_buf());
        s.busy = false;
        s.position = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self, from_start: bool) -> Result<(), EngineError> {
        self.record(Call::Play(from_start))?;
        let mut s = self.0.borrow_mut();
        if from_start {
            s.position = Duration::ZERO;
        }
        s.busy = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.record(Call::Pause)?;
        self.0.borrow_mut().busy = false;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.record(Call::Resume)?;
        self.0.borrow_mut().busy = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.record(Call::Stop)?;
        let mut s = self.0.borrow_mut();
        s.busy = false;
        s.loaded = None;
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        self.record(Call::Seek(position))?;
        self.0.borrow_mut().position = position;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), EngineError> {
        self.record(Call::SetVolume(volume))
    }

    fn is_busy(&self) -> Result<bool, EngineError> {
        let s = self.0.borrow();
        if s.queries_fail {
            return Err(EngineError::Unavailable("poll failed".into()));
        }
        Ok(s.busy)
    }

    fn position(&self) -> Result<Duration, EngineError> {
        let s = self.0.borrow();
        if s.queries_fail {
            return Err(EngineError::Unavailable("poll failed".into()));
        }
        Ok(s.position)
    }

    fn duration(&self, path: &Path) -> Result<Option<Duration>, EngineError> {
        // Like most decoders, only the loaded track has a known length.
        let s = self.0.borrow();
        if s.loaded.as_deref() != Some(path) {
            return Ok(None);
        }
        Ok(s.durations.get(path).copied())
    }
}

