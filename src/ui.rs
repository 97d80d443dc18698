//! Rendering for the terminal user interface.

use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{
        Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Sparkline,
        Wrap,
    },
};

use crate::config::Settings;
use crate::playback::TransportState;
use crate::runtime::ViewState;

mod visualizer;

pub use visualizer::Visualizer;


static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected");
    map.insert("s", "stop");
    map.insert("+/-", "volume");
    map.insert("a", "add path");
    map.insert("d/D", "remove/clear");
    map.insert("P", "playlist");
    map.insert("q", "quit");
    map
});

/// Controls help line; the scrub entry depends on config.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "space/p", "h/l", "H/L", "j/k", "enter", "s", "+/-", "a", "d/D", "P", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{scrub_seconds}s"))
            } else {
                CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn format_total(d: Option<Duration>) -> String {
    d.map(format_mmss).unwrap_or_else(|| "--:--".to_string())
}

/// Map a terminal column on the progress bar to a position in the track.
/// Columns left or right of the bar clamp to its ends.
pub fn position_at(bar: Rect, column: u16, duration: Option<Duration>) -> Option<Duration> {
    let duration = duration?;
    if bar.width == 0 {
        return None;
    }
    let offset = column.saturating_sub(bar.x).min(bar.width - 1);
    let span = bar.width.saturating_sub(1).max(1);
    let fraction = f64::from(offset) / f64::from(span);
    Some(Duration::from_secs_f64(duration.as_secs_f64() * fraction.min(1.0)))
}

fn transport_label(state: TransportState) -> &'static str {
    match state {
        TransportState::Playing => "Playing",
        TransportState::Paused => "Paused",
        TransportState::Stopped => "Stopped",
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(title).padding(Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    })
}

fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    Rect {
        x: r.x + (r.width.saturating_sub(width) / 2),
        y: r.y + (r.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

/// Render the whole UI. Returns the area of the progress gauge so mouse
/// events can be mapped onto it.
pub fn draw(
    frame: &mut Frame,
    view: &ViewState,
    visualizer: &Visualizer,
    settings: &Settings,
) -> Rect {
    let ui = &settings.ui;
    let mut constraints = vec![Constraint::Length(3)];
    if ui.show_visualizer {
        constraints.push(Constraint::Length(7));
    }
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Length(3));
    constraints.push(if view.show_playlist {
        Constraint::Min(3)
    } else {
        Constraint::Min(0)
    });
    constraints.push(Constraint::Length(4));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());
    let mut next = 0;
    let mut take = || {
        let area = chunks[next];
        next += 1;
        area
    };

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, take());

    if ui.show_visualizer {
        let bars = Sparkline::default()
            .block(Block::default().borders(Borders::ALL))
            .data(visualizer.bars().iter().copied())
            .max(visualizer.max_height())
            .style(Style::default().fg(Color::Green));
        frame.render_widget(bars, take());
    }

    let gauge_area = draw_progress(frame, view, take());

    let status = [
        transport_label(view.transport).to_string(),
        format!("Vol: {:.0}%", view.volume * 100.0),
        view.status.clone(),
    ]
    .join(" • ");
    let status_par = Paragraph::new(status)
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, take());

    let list_area = take();
    if view.show_playlist {
        draw_playlist(frame, view, list_area);
    }

    let footer = Paragraph::new(controls_text(settings.controls.scrub_seconds))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, take());

    if let Some(input) = &view.prompt {
        let area = centered_rect_sized(72, 3, frame.area());
        frame.render_widget(Clear, area);
        let prompt = Paragraph::new(format!("{input}_"))
            .block(left_padded(" add file or directory (enter adds, esc cancels) "));
        frame.render_widget(prompt, area);
    }

    gauge_area
}

fn draw_progress(frame: &mut Frame, view: &ViewState, area: Rect) -> Rect {
    let block = Block::default().borders(Borders::ALL).title(
        view.now_playing
            .as_deref()
            .map(|s| format!(" {s} "))
            .unwrap_or_else(|| " progress ".to_string()),
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(7), Constraint::Min(1), Constraint::Length(7)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(format_mmss(view.elapsed)).alignment(Alignment::Left),
        row[0],
    );
    let gauge = Gauge::default()
        .ratio(view.ratio())
        .label("")
        .gauge_style(Style::default().fg(Color::Green));
    frame.render_widget(gauge, row[1]);
    frame.render_widget(
        Paragraph::new(format_total(view.duration)).alignment(Alignment::Right),
        row[2],
    );
    row[1]
}

fn draw_playlist(frame: &mut Frame, view: &ViewState, area: Rect) {
    let items: Vec<ListItem> = view
        .playlist
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if view.loaded_index == Some(i) {
                ListItem::new(format!("♪ {name}"))
                    .style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(format!("  {name}"))
            }
        })
        .collect();

    let title = format!(" playlist ({}) ", view.playlist.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !view.playlist.is_empty() {
        state.select(Some(view.cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
