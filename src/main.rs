use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use klok::{
    app::{App, Tab},
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    notify::DesktopNotifier,
    runtime::{ClockEvent, ClockEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    schedule::STOPWATCH_SAMPLE_MS,
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    time::Duration,
};

/// stopwatch with laps and a countdown timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal stopwatch with lap splits and a countdown timer that accepts free-text durations like \"1h 30m\", \"45s\" or \"90\"."
)]
pub struct Cli {
    /// prefill the timer with a duration, e.g. "25m" or "1h 30m"
    #[clap(short = 't', long)]
    timer: Option<String>,

    /// screen to open on (defaults to the config file, or timer when --timer is given)
    #[clap(long, value_enum)]
    tab: Option<Tab>,

    /// never send desktop notifications; always use the in-terminal alert
    #[clap(long)]
    no_notify: bool,

    /// log level for the log file (overridden by KLOK_LOG)
    #[clap(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Layer command line flags over the stored configuration
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(tab) = self.tab {
            config.start_tab = tab;
        } else if self.timer.is_some() {
            config.start_tab = Tab::Timer;
        }
        if self.no_notify {
            config.desktop_notifications = false;
        }
        config
    }
}

fn build_app<C: Clock + Clone>(cli: &Cli, config: &Config, clock: C) -> App<C> {
    let notifier = DesktopNotifier::new(config.desktop_notifications);
    let mut app = App::new(clock, config, Box::new(notifier));
    if let Some(text) = &cli.timer {
        app.set_timer_input(text);
    }
    app
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        logging::init(&path, &cli.log_level);
    }

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    tracing::info!(config = %store.path().display(), start_tab = %config.start_tab, "starting klok");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = build_app(&cli, &config, SystemClock);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(STOPWATCH_SAMPLE_MS)),
    );
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        tracing::error!(error = %e, "terminal loop failed");
    }
    res
}

fn start_tui<B, C, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend + Write,
    C: Clock,
    E: ClockEventSource,
    T: Ticker,
{
    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit {
        let redraw = step(app, runner);

        if app.take_bell() {
            let backend = terminal.backend_mut();
            backend.write_all(b"\x07")?;
            Write::flush(backend)?;
        }

        if redraw && !app.should_quit {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}

/// Advance the app by one runner step. Returns true when a redraw is needed.
fn step<C: Clock, E: ClockEventSource, T: Ticker>(app: &mut App<C>, runner: &Runner<E, T>) -> bool {
    let event = runner.step();

    // engines are polled on every step so key bursts don't starve sampling
    let mut redraw = app.on_tick();
    match event {
        ClockEvent::Tick => {}
        ClockEvent::Resize => redraw = true,
        ClockEvent::Key(key) => redraw |= app.on_key(key),
    }
    redraw
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use klok::{clock::ManualClock, runtime::TestEventSource};
    use std::sync::mpsc;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["klok"]);

        assert_eq!(cli.timer, None);
        assert_eq!(cli.tab, None);
        assert!(!cli.no_notify);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_cli_timer() {
        let cli = Cli::parse_from(["klok", "-t", "25m"]);
        assert_eq!(cli.timer.as_deref(), Some("25m"));

        let cli = Cli::parse_from(["klok", "--timer", "1h 30m"]);
        assert_eq!(cli.timer.as_deref(), Some("1h 30m"));
    }

    #[test]
    fn test_cli_tab() {
        let cli = Cli::parse_from(["klok", "--tab", "timer"]);
        assert_eq!(cli.tab, Some(Tab::Timer));

        let cli = Cli::parse_from(["klok", "--tab", "stopwatch"]);
        assert_eq!(cli.tab, Some(Tab::Stopwatch));

        assert!(Cli::try_parse_from(["klok", "--tab", "alarm"]).is_err());
    }

    #[test]
    fn test_timer_flag_opens_timer_tab() {
        let cli = Cli::parse_from(["klok", "-t", "5m"]);
        let config = cli.apply_to(Config::default());
        assert_eq!(config.start_tab, Tab::Timer);

        let cli = Cli::parse_from(["klok", "-t", "5m", "--tab", "stopwatch"]);
        let config = cli.apply_to(Config::default());
        assert_eq!(config.start_tab, Tab::Stopwatch);
    }

    #[test]
    fn test_no_notify_overrides_config() {
        let cli = Cli::parse_from(["klok", "--no-notify"]);
        let config = cli.apply_to(Config::default());
        assert!(!config.desktop_notifications);
    }

    #[test]
    fn test_build_app_prefills_timer() {
        let cli = Cli::parse_from(["klok", "-t", "1h 30m"]);
        let config = cli.apply_to(Config::default());
        let app = build_app(&cli, &config, ManualClock::new(0));

        assert_eq!(app.tab, Tab::Timer);
        assert_eq!(app.timer_input, "1h 30m");
        assert_eq!(app.timer.configured_secs(), 5400);
    }

    #[test]
    fn test_step_runs_until_escape() {
        let cli = Cli::parse_from(["klok"]);
        let clock = ManualClock::new(0);
        let mut app = build_app(&cli, &Config::default(), clock.clone());

        let (tx, rx) = mpsc::channel();
        tx.send(ClockEvent::Key(KeyEvent::new(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
        )))
        .unwrap();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        assert!(step(&mut app, &runner));
        assert!(app.stopwatch.is_running());

        // idle tick while running still asks for a redraw
        clock.advance(20);
        assert!(step(&mut app, &runner));
        assert_eq!(app.stopwatch.elapsed_millis(), 20);

        tx.send(ClockEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
            .unwrap();
        step(&mut app, &runner);
        assert!(app.should_quit);
    }
}
