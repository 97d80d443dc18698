use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Position, layout::Rect};

use crate::config;
use crate::library;
use crate::playback::{AudioEngine, MediaPlayer, PlayerEvent};
use crate::ui::{self, Visualizer};

use super::view::ViewState;

#[cfg(test)]
mod tests;

/// State the loop carries between iterations besides the view itself.
pub struct EventLoopState {
    next_tick: Instant,
    next_visual: Instant,
    /// Set while a keyboard scrub is open; the drag commits when it passes.
    scrub_deadline: Option<Instant>,
    /// Last drawn area of the progress gauge.
    gauge: Rect,
    visualizer: Visualizer,
}

impl EventLoopState {
    pub fn new(settings: &config::Settings) -> Self {
        let now = Instant::now();
        Self {
            next_tick: now,
            next_visual: now,
            scrub_deadline: None,
            gauge: Rect::default(),
            visualizer: Visualizer::new(settings.progress.visualizer_bars),
        }
    }
}

/// Main terminal event loop. Returns `Ok(())` when the user quits.
pub fn run<E: AudioEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    player: &mut MediaPlayer<E>,
    events: &Receiver<PlayerEvent>,
    view: &mut ViewState,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_every = Duration::from_millis(settings.progress.tick_ms);
    let visual_every = Duration::from_millis(settings.progress.visualizer_tick_ms);

    loop {
        let now = Instant::now();
        if state.scrub_deadline.is_some_and(|d| now >= d) {
            commit_scrub(player, state);
        }
        if now >= state.next_tick {
            player.tick();
            state.next_tick = now + tick_every;
        }
        if now >= state.next_visual {
            let busy = player.controller().engine().is_busy().unwrap_or(false);
            state.visualizer.tick(busy);
            state.next_visual = now + visual_every;
        }

        while let Ok(ev) = events.try_recv() {
            view.apply(ev);
        }

        terminal.draw(|f| state.gauge = ui::draw(f, view, &state.visualizer, settings))?;

        if event::poll(Duration::from_millis(50))? {
            let quit = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, settings, player, view, state)
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(mouse, player, view, state);
                    false
                }
                _ => false,
            };
            if quit {
                return Ok(());
            }
        }
    }
}

fn commit_scrub<E: AudioEngine>(player: &mut MediaPlayer<E>, state: &mut EventLoopState) {
    state.scrub_deadline = None;
    if let Some(target) = player.progress().drag().pending() {
        let _ = player.end_drag(target);
    } else if player.is_dragging() {
        let at = player.progress().displayed().unwrap_or_default();
        let _ = player.end_drag(at);
    }
}

/// Drop any open scrub or drag without seeking, before the track under it
/// changes.
fn abandon_scrub<E: AudioEngine>(player: &mut MediaPlayer<E>, state: &mut EventLoopState) {
    state.scrub_deadline = None;
    player.cancel_drag();
}

/// Nudge the keyboard scrub by `step` seconds, opening a drag on the first
/// press. Nothing reaches the engine until the scrub commits.
fn scrub<E: AudioEngine>(
    player: &mut MediaPlayer<E>,
    view: &ViewState,
    state: &mut EventLoopState,
    settings: &config::Settings,
    forward: bool,
) {
    if player.controller().loaded_index().is_none() {
        return;
    }
    if !player.is_dragging() {
        player.begin_drag();
    }
    let from = player.progress().drag().pending().unwrap_or(view.elapsed);
    let step = Duration::from_secs(settings.controls.scrub_seconds);
    let target = if forward {
        from + step
    } else {
        from.saturating_sub(step)
    };
    player.drag_move(target);
    state.scrub_deadline =
        Some(Instant::now() + Duration::from_millis(settings.controls.scrub_commit_ms));
}

fn handle_prompt_key<E: AudioEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    player: &mut MediaPlayer<E>,
    view: &mut ViewState,
) {
    let Some(input) = view.prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => view.prompt = None,
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Enter => {
            let raw = input.trim().to_string();
            view.prompt = None;
            if raw.is_empty() {
                return;
            }
            let tracks = library::collect(&[PathBuf::from(&raw)], &settings.library);
            if tracks.is_empty() {
                tracing::info!("nothing playable under {raw}");
                view.status = format!("No audio files in {raw}");
            } else {
                player.add_tracks(tracks);
            }
        }
        KeyCode::Char(c) if !c.is_control() => input.push(c),
        _ => {}
    }
}

/// Returns true when the user asked to quit.
fn handle_key_event<E: AudioEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    player: &mut MediaPlayer<E>,
    view: &mut ViewState,
    state: &mut EventLoopState,
) -> bool {
    if view.prompt.is_some() {
        handle_prompt_key(key, settings, player, view);
        return false;
    }

    // Player errors are already published as status messages.
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            let _ = player.play_or_toggle();
        }
        KeyCode::Char('l') => {
            abandon_scrub(player, state);
            let _ = player.next();
        }
        KeyCode::Char('h') => {
            abandon_scrub(player, state);
            let _ = player.previous();
        }
        KeyCode::Char('s') => {
            abandon_scrub(player, state);
            let _ = player.stop();
        }
        KeyCode::Char('j') => view.cursor_down(),
        KeyCode::Char('k') => view.cursor_up(),
        KeyCode::Enter => {
            if state.scrub_deadline.is_some() {
                commit_scrub(player, state);
            } else if !view.playlist.is_empty() {
                abandon_scrub(player, state);
                let _ = player.select_track(view.cursor);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = player.controller().volume() + settings.audio.volume_step;
            let _ = player.set_volume(v);
        }
        KeyCode::Char('-') => {
            let v = player.controller().volume() - settings.audio.volume_step;
            let _ = player.set_volume(v);
        }
        KeyCode::Char('L') => scrub(player, view, state, settings, true),
        KeyCode::Char('H') => scrub(player, view, state, settings, false),
        KeyCode::Char('a') => view.prompt = Some(String::new()),
        KeyCode::Char('d') => {
            if !view.playlist.is_empty() {
                abandon_scrub(player, state);
                let _ = player.remove_track(view.cursor);
            }
        }
        KeyCode::Char('D') => {
            abandon_scrub(player, state);
            player.clear_playlist();
        }
        KeyCode::Char('P') => view.show_playlist = !view.show_playlist,
        _ => {}
    }
    false
}

fn handle_mouse_event<E: AudioEngine>(
    mouse: MouseEvent,
    player: &mut MediaPlayer<E>,
    view: &ViewState,
    state: &mut EventLoopState,
) {
    let on_gauge = state.gauge.contains(Position::new(mouse.column, mouse.row));
    let position = ui::position_at(state.gauge, mouse.column, view.duration);

    match (mouse.kind, position) {
        (MouseEventKind::Down(MouseButton::Left), Some(at)) if on_gauge => {
            state.scrub_deadline = None;
            player.begin_drag();
            player.drag_move(at);
        }
        (MouseEventKind::Drag(MouseButton::Left), Some(at)) if player.is_dragging() => {
            player.drag_move(at);
        }
        (MouseEventKind::Up(MouseButton::Left), _) if player.is_dragging() => {
            let at = position
                .or_else(|| player.progress().displayed())
                .unwrap_or_default();
            let _ = player.end_drag(at);
        }
        _ => {}
    }
}
