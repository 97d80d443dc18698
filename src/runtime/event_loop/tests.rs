use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::{EventLoopState, commit_scrub, handle_key_event, handle_mouse_event};
use crate::config::Settings;
use crate::library::Track;
use crate::playback::fake_engine::{Call, FakeEngine};
use crate::playback::{MediaPlayer, PlayerEvent, PlayerOptions};
use crate::runtime::view::ViewState;

const A: &str = "/music/a.mp3";
const B: &str = "/music/b.mp3";

struct Shell {
    settings: Settings,
    engine: FakeEngine,
    player: MediaPlayer<FakeEngine>,
    events: Receiver<PlayerEvent>,
    view: ViewState,
    state: EventLoopState,
}

impl Shell {
    fn new(engine: FakeEngine, paths: &[&str]) -> Self {
        let settings = Settings::default();
        let mut player = MediaPlayer::new(engine.clone(), PlayerOptions::default());
        let events = player.subscribe();
        player.add_tracks(paths.iter().map(|p| Track::from_path(*p)).collect());
        let state = EventLoopState::new(&settings);
        let mut shell = Self {
            view: ViewState::new(1.0, true),
            settings,
            engine,
            player,
            events,
            state,
        };
        shell.sync();
        shell.engine.clear_calls();
        shell
    }

    fn sync(&mut self) {
        while let Ok(ev) = self.events.try_recv() {
            self.view.apply(ev);
        }
    }

    fn press(&mut self, code: KeyCode) -> bool {
        let quit = handle_key_event(
            KeyEvent::new(code, KeyModifiers::NONE),
            &self.settings,
            &mut self.player,
            &mut self.view,
            &mut self.state,
        );
        self.sync();
        quit
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        let event = MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(event, &mut self.player, &self.view, &mut self.state);
        self.sync();
    }

    /// Let the engine clock run to `secs` and poll it once.
    fn played_to(&mut self, secs: u64) {
        self.engine.set_position(secs);
        self.player.tick();
        self.sync();
    }

    fn commit(&mut self) {
        commit_scrub(&mut self.player, &mut self.state);
        self.sync();
    }
}

const LEFT: MouseButton = MouseButton::Left;

#[test]
fn scrub_burst_commits_a_single_seek() {
    let mut shell = Shell::new(FakeEngine::with_durations(&[(A, 180)]), &[A]);
    shell.press(KeyCode::Char(' '));
    shell.played_to(100);

    for key in ['L', 'L', 'L', 'H'] {
        shell.press(KeyCode::Char(key));
    }
    assert!(shell.player.is_dragging());
    assert!(shell.state.scrub_deadline.is_some());
    assert_eq!(shell.view.elapsed, Duration::from_secs(110));
    assert!(shell.engine.seeks().is_empty());

    shell.commit();
    assert_eq!(shell.engine.seeks(), vec![Duration::from_secs(110)]);
    assert!(!shell.player.is_dragging());
    assert!(shell.state.scrub_deadline.is_none());
}

#[test]
fn scrub_without_a_loaded_track_does_nothing() {
    let mut shell = Shell::new(FakeEngine::with_durations(&[(A, 180)]), &[A]);
    shell.press(KeyCode::Char('L'));
    assert!(!shell.player.is_dragging());
    assert!(shell.state.scrub_deadline.is_none());
}

#[test]
fn enter_commits_open_scrub_instead_of_selecting() {
    let mut shell = Shell::new(FakeEngine::with_durations(&[(A, 180), (B, 200)]), &[A, B]);
    shell.press(KeyCode::Char(' '));
    shell.press(KeyCode::Char('j'));
    shell.press(KeyCode::Char('L'));
    shell.engine.clear_calls();

    shell.press(KeyCode::Enter);
    assert_eq!(shell.engine.calls(), vec![Call::Seek(Duration::from_secs(5))]);
    assert_eq!(shell.player.controller().loaded_index(), Some(0));

    shell.press(KeyCode::Enter);
    assert_eq!(shell.player.controller().loaded_index(), Some(1));
}

#[test]
fn next_during_scrub_starts_new_track_from_zero() {
    let mut shell = Shell::new(FakeEngine::with_durations(&[(A, 180), (B, 200)]), &[A, B]);
    shell.press(KeyCode::Char(' '));
    shell.played_to(100);
    shell.press(KeyCode::Char('L'));

    shell.press(KeyCode::Char('l'));
    assert!(!shell.player.is_dragging());
    assert!(shell.state.scrub_deadline.is_none());

    shell.commit();
    assert!(shell.engine.seeks().is_empty());
    assert_eq!(shell.player.controller().loaded_index(), Some(1));
    assert_eq!(shell.view.elapsed, Duration::ZERO);
}

#[test]
fn progress_resumes_after_stop_during_scrub() {
    let mut shell = Shell::new(FakeEngine::with_durations(&[(A, 180)]), &[A]);
    shell.press(KeyCode::Char(' '));
    shell.press(KeyCode::Char('L'));
    shell.press(KeyCode::Char('s'));
    shell.press(KeyCode::Char(' '));

    shell.played_to(7);
    assert!(!shell.player.is_dragging());
    assert_eq!(shell.view.elapsed, Duration::from_secs(7));
    assert!(shell.engine.seeks().is_empty());
}

#[test]
fn mouse_drag_on_gauge_seeks_once_on_release() {
    let mut shell = Shell::new(FakeEngine::with_durations(&[(A, 100)]), &[A]);
    shell.press(KeyCode::Char(' '));
    shell.state.gauge = Rect::new(10, 5, 11, 1);

    shell.mouse(MouseEventKind::Down(LEFT), 15, 5);
    assert!(shell.player.is_dragging());
    assert_eq!(shell.view.elapsed, Duration::from_secs(50));

    shell.mouse(MouseEventKind::Drag(LEFT), 20, 5);
    assert_eq!(shell.view.elapsed, Duration::from_secs(100));
    assert!(shell.engine.seeks().is_empty());

    shell.mouse(MouseEventKind::Up(LEFT), 12, 5);
    assert!(!shell.player.is_dragging());
    assert_eq!(shell.engine.seeks(), vec![Duration::from_secs(20)]);
}

#[test]
fn press_off_the_gauge_does_not_start_a_drag() {
    let mut shell = Shell::new(FakeEngine::with_durations(&[(A, 100)]), &[A]);
    shell.press(KeyCode::Char(' '));
    shell.state.gauge = Rect::new(10, 5, 11, 1);

    shell.mouse(MouseEventKind::Down(LEFT), 15, 0);
    assert!(!shell.player.is_dragging());
    shell.mouse(MouseEventKind::Up(LEFT), 15, 0);
    assert!(shell.engine.seeks().is_empty());
}

#[test]
fn release_without_a_mappable_position_commits_displayed_value() {
    let mut shell = Shell::new(FakeEngine::with_durations(&[(A, 100)]), &[A]);
    shell.press(KeyCode::Char(' '));
    shell.state.gauge = Rect::new(10, 5, 11, 1);

    shell.mouse(MouseEventKind::Down(LEFT), 15, 5);
    shell.view.duration = None;
    shell.mouse(MouseEventKind::Up(LEFT), 0, 0);

    assert_eq!(shell.engine.seeks(), vec![Duration::from_secs(50)]);
}

#[test]
fn prompt_adds_tracks_from_typed_path() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("fresh.mp3");
    std::fs::write(&file, b"placeholder bytes").unwrap();

    let mut shell = Shell::new(FakeEngine::default(), &[A]);
    shell.press(KeyCode::Char('a'));
    for c in file.to_string_lossy().chars() {
        shell.press(KeyCode::Char(c));
    }
    assert_eq!(shell.view.prompt.as_deref(), Some(&*file.to_string_lossy()));

    shell.press(KeyCode::Enter);
    assert!(shell.view.prompt.is_none());
    assert_eq!(shell.view.playlist, vec!["a".to_string(), "fresh".to_string()]);
}

#[test]
fn quit_key_ends_the_loop() {
    let mut shell = Shell::new(FakeEngine::default(), &[A]);
    assert!(!shell.press(KeyCode::Char('j')));
    assert!(shell.press(KeyCode::Char('q')));
}
