pub mod dial;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::{
    app::{App, Tab},
    clock::Clock,
};

const HORIZONTAL_MARGIN: u16 = 2;

/// Render the whole application: tab header, active screen, legend, alert
pub fn draw<C: Clock>(app: &App<C>, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(0),    // screen
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    render_tabs(app.tab, f, chunks[0]);
    screen::current_screen::<C>(app.tab).render(app, f, chunks[1]);
    render_legend(app, f, chunks[2]);

    if let Some(message) = &app.alert {
        render_alert(message, f);
    }
}

fn render_tabs(active: Tab, f: &mut Frame, area: Rect) {
    let titles = [Tab::Stopwatch, Tab::Timer]
        .iter()
        .map(|t| Line::from(t.to_string()))
        .collect::<Vec<_>>();
    let selected = match active {
        Tab::Stopwatch => 0,
        Tab::Timer => 1,
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("klok"))
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_legend<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let text = match app.tab {
        Tab::Stopwatch => format!(
            "(space) {} / (enter) {} / (tab) timer / (esc)ape",
            app.start_stop_label().to_lowercase(),
            app.lap_reset_label().to_lowercase()
        ),
        Tab::Timer if app.timer.shows_picker() => {
            "type a duration / (↑↓) presets / (enter) start / (tab) stopwatch / (esc)ape"
                .to_string()
        }
        Tab::Timer => format!(
            "(space) {} / (r)eset / (tab) stopwatch / (esc)ape",
            app.timer_primary_label().to_lowercase()
        ),
    };

    let legend = Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC),
    ));
    f.render_widget(legend, area);
}

/// Centered rect of fixed size, clamped to `area`
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_alert(message: &str, f: &mut Frame) {
    let area = centered(36, 5, f.area());
    let alert = Paragraph::new(vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "press any key",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Timer"));

    f.render_widget(Clear, area);
    f.render_widget(alert, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, config::Config, notify::DesktopNotifier};
    use ratatui::{backend::TestBackend, Terminal};

    fn create_test_app() -> (App<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let app = App::new(
            clock.clone(),
            &Config::default(),
            Box::new(DesktopNotifier::new(false)),
        );
        (app, clock)
    }

    fn rendered(app: &App<ManualClock>) -> String {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn stopwatch_screen_shows_time_and_laps() {
        let (mut app, clock) = create_test_app();
        app.stopwatch.toggle_start_stop();
        clock.advance(3_661_230);
        app.on_tick();
        app.stopwatch.record_lap();

        let content = rendered(&app);
        assert!(content.contains("01:01:01.23"));
        assert!(content.contains("Lap 1"));
        assert!(content.contains("(space) stop"));
    }

    #[test]
    fn timer_picker_shows_input_and_preview() {
        let (mut app, _) = create_test_app();
        app.tab = Tab::Timer;
        app.set_timer_input("1h 30m");

        let content = rendered(&app);
        assert!(content.contains("1h 30m"));
        assert!(content.contains("01:30:00"));
        assert!(content.contains("25m"));
    }

    #[test]
    fn timer_countdown_shows_phrase() {
        let (mut app, clock) = create_test_app();
        app.tab = Tab::Timer;
        app.set_timer_input("2m");
        app.timer.start_or_resume();
        clock.advance(1_000);
        app.on_tick();

        let content = rendered(&app);
        assert!(content.contains("00:01:59"));
        assert!(content.contains("1 minute remaining"));
        assert!(content.contains("(space) pause"));
    }

    #[test]
    fn alert_is_drawn_over_screen() {
        let (mut app, _) = create_test_app();
        app.alert = Some("Time's up!".to_string());
        assert!(rendered(&app).contains("Time's up!"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let (mut app, _) = create_test_app();
        app.alert = Some("Time's up!".to_string());
        app.tab = Tab::Timer;
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();
    }
}
