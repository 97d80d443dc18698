use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::RodioEngine;
use crate::config;
use crate::library;
use crate::playback::{MediaPlayer, PlayerOptions};

mod event_loop;
mod logging;
mod settings;
mod view;

pub use settings::load_settings;
pub use view::ViewState;

#[cfg(test)]
mod tests;

/// Start the player on `paths` (files or directories).
pub fn run(paths: Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings();
    if let Some(log) = logging::init(&settings.log) {
        tracing::info!("logging to {}", log.display());
    }

    let paths = if paths.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        paths
    };
    let tracks = library::collect(&paths, &settings.library);
    tracing::info!("found {} track(s) under {:?}", tracks.len(), paths);

    // Without an output device there is nothing to do, so fail before the
    // terminal is touched.
    let engine = RodioEngine::new(&settings.audio)?;
    let mut player = MediaPlayer::new(engine, options_from(&settings));
    let events = player.subscribe();
    player.add_tracks(tracks);

    let mut view = ViewState::new(player.controller().volume(), settings.ui.show_playlist);
    if player.controller().playlist().is_empty() {
        view.status = "No tracks yet, press 'a' to add some".to_string();
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new(&settings);
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut player,
        &events,
        &mut view,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("shutting down");
    player
        .into_engine()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));

    run_result
}

fn options_from(settings: &config::Settings) -> PlayerOptions {
    PlayerOptions {
        initial_volume: settings.audio.initial_volume,
        auto_advance: settings.playback.auto_advance,
    }
}
