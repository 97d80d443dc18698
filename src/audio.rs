//! rodio-backed playback engine.

mod player;
mod sink;
mod thread;
mod types;

pub use player::RodioEngine;
