use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Tab},
    clock::Clock,
    duration::format_preset,
    format::format_stopwatch,
    timer::TimerPhase,
    ui::dial::Dial,
};

/// A UI Screen boundary: renders one tab's content into its area
pub trait Screen<C: Clock> {
    fn render(&self, app: &App<C>, f: &mut Frame, area: Rect);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn buttons(primary: &str, secondary: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("[ {} ]", primary), bold().fg(Color::Green)),
        Span::raw("   "),
        Span::styled(format!("[ {} ]", secondary), bold().fg(Color::Gray)),
    ])
}

/// Stopwatch display, controls and the lap list
pub struct StopwatchScreen;

impl<C: Clock> Screen<C> for StopwatchScreen {
    fn render(&self, app: &App<C>, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // elapsed time
                Constraint::Length(1), // controls
                Constraint::Min(0),    // laps
            ])
            .split(area);

        let style = if app.stopwatch.is_running() {
            bold().fg(Color::White)
        } else {
            bold().add_modifier(Modifier::DIM)
        };
        let time = Paragraph::new(Span::styled(app.stopwatch.display(), style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(time, chunks[0]);

        let controls = Paragraph::new(buttons(app.start_stop_label(), app.lap_reset_label()))
            .alignment(Alignment::Center);
        f.render_widget(controls, chunks[1]);

        let rows = app
            .stopwatch
            .laps_newest_first()
            .map(|lap| {
                Row::new(vec![
                    Cell::from(format!("Lap {}", lap.index)),
                    Cell::from(format_stopwatch(lap.split_millis)),
                    Cell::from(format_stopwatch(lap.cumulative_millis))
                        .style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect_vec();

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Length(14),
            ],
        )
        .header(
            Row::new(vec!["", "Split", "Total"]).style(bold().fg(Color::Yellow)),
        )
        .block(Block::default().borders(Borders::ALL).title("Laps"));
        f.render_widget(table, chunks[2]);
    }
}

/// Timer picker when idle, countdown view once started
pub struct TimerScreen;

impl TimerScreen {
    fn render_picker<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // input
                Constraint::Length(1), // preview
                Constraint::Length(1), // controls
                Constraint::Min(0),    // presets
            ])
            .split(area);

        let input = Paragraph::new(app.timer_input.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Duration (e.g. 1h 30m, 45s, 90)"),
        );
        f.render_widget(input, chunks[0]);

        if chunks[0].width > 2 && chunks[0].height > 2 {
            let x = (chunks[0].x + 1 + app.timer_input.width() as u16)
                .min(chunks[0].right().saturating_sub(2));
            f.set_cursor_position(Position::new(x, chunks[0].y + 1));
        }

        let preview_style = if app.timer.configured_secs() > 0 {
            bold().fg(Color::Cyan)
        } else {
            bold().add_modifier(Modifier::DIM)
        };
        let preview = Paragraph::new(Span::styled(app.timer.preview(), preview_style))
            .alignment(Alignment::Center);
        f.render_widget(preview, chunks[1]);

        let controls =
            Paragraph::new(buttons(app.timer_primary_label(), "Reset")).alignment(Alignment::Center);
        f.render_widget(controls, chunks[2]);

        let items = app
            .presets
            .iter()
            .map(|&secs| ListItem::new(format_preset(secs)))
            .collect_vec();
        let presets = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Presets"))
            .highlight_style(bold().fg(Color::Black).bg(Color::Cyan))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(app.selected_preset);
        f.render_stateful_widget(presets, chunks[3], &mut state);
    }

    fn render_countdown<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // dial
                Constraint::Length(1), // countdown
                Constraint::Length(1), // phrase
                Constraint::Length(1), // bar
                Constraint::Length(1), // controls
            ])
            .split(area);

        let paused = app.timer.phase() == TimerPhase::Paused;
        let color = if paused { Color::Yellow } else { Color::Cyan };
        let progress = app.timer.progress();

        f.render_widget(Dial::new(progress).color(color), chunks[0]);

        let mut countdown = vec![Span::styled(app.timer.display(), bold().fg(color))];
        if paused {
            countdown.push(Span::styled("  paused", Style::default().fg(Color::Yellow)));
        }
        f.render_widget(
            Paragraph::new(Line::from(countdown)).alignment(Alignment::Center),
            chunks[1],
        );

        f.render_widget(
            Paragraph::new(app.timer.remaining_phrase()).alignment(Alignment::Center),
            chunks[2],
        );

        let bar = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
            .ratio(progress)
            .label("");
        f.render_widget(bar, chunks[3]);

        let controls =
            Paragraph::new(buttons(app.timer_primary_label(), "Reset")).alignment(Alignment::Center);
        f.render_widget(controls, chunks[4]);
    }
}

impl<C: Clock> Screen<C> for TimerScreen {
    fn render(&self, app: &App<C>, f: &mut Frame, area: Rect) {
        if app.timer.shows_picker() {
            Self::render_picker(app, f, area);
        } else {
            Self::render_countdown(app, f, area);
        }
    }
}

/// Helper to construct the screen for the active tab
pub fn current_screen<C: Clock>(tab: Tab) -> Box<dyn Screen<C>> {
    match tab {
        Tab::Stopwatch => Box::new(StopwatchScreen),
        Tab::Timer => Box::new(TimerScreen),
    }
}
