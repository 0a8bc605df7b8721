use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::Config;
use crate::duration::format_preset;
use crate::notify::{signal_completion, Delivery, Notifier, COMPLETION_SUMMARY};
use crate::stopwatch::Stopwatch;
use crate::timer::{Timer, TimerEvent, TimerPhase};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Stopwatch,
    Timer,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Stopwatch => Tab::Timer,
            Tab::Timer => Tab::Stopwatch,
        }
    }
}

/// Everything the screens need: both engines plus the view state around them
pub struct App<C: Clock> {
    pub tab: Tab,
    pub stopwatch: Stopwatch<C>,
    pub timer: Timer<C>,
    pub timer_input: String,
    pub presets: Vec<u64>,
    pub selected_preset: Option<usize>,
    /// Blocking completion alert; swallows the next key press
    pub alert: Option<String>,
    pub should_quit: bool,
    notifier: Box<dyn Notifier>,
    bell: bool,
}

impl<C: Clock + Clone> App<C> {
    pub fn new(clock: C, config: &Config, notifier: Box<dyn Notifier>) -> Self {
        Self {
            tab: config.start_tab,
            stopwatch: Stopwatch::new(clock.clone()),
            timer: Timer::new(clock),
            timer_input: String::new(),
            presets: config.presets.clone(),
            selected_preset: None,
            alert: None,
            should_quit: false,
            notifier,
            bell: false,
        }
    }
}

impl<C: Clock> App<C> {
    /// Prefill the timer input as if typed
    pub fn set_timer_input(&mut self, text: &str) {
        self.timer_input = text.to_string();
        self.timer.set_input(&self.timer_input);
    }

    /// Apply the preset at `idx` to the timer input
    pub fn select_preset(&mut self, idx: usize) {
        if let Some(&seconds) = self.presets.get(idx) {
            self.selected_preset = Some(idx);
            self.timer_input = self.timer.select_preset(seconds);
        }
    }

    fn cycle_preset(&mut self, forward: bool) {
        let len = self.presets.len();
        if len == 0 {
            return;
        }
        let idx = match (self.selected_preset, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.select_preset(idx);
    }

    pub fn start_stop_label(&self) -> &'static str {
        if self.stopwatch.is_running() {
            "Stop"
        } else {
            "Start"
        }
    }

    pub fn lap_reset_label(&self) -> &'static str {
        if self.stopwatch.is_running() {
            "Lap"
        } else {
            "Reset"
        }
    }

    pub fn timer_primary_label(&self) -> &'static str {
        match self.timer.phase() {
            TimerPhase::Idle => "Start",
            TimerPhase::Running => "Pause",
            TimerPhase::Paused => "Resume",
        }
    }

    /// True once after a completion that fell back to the terminal alert
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    /// Advance both engines. Returns true when the screen needs a redraw.
    pub fn on_tick(&mut self) -> bool {
        self.stopwatch.on_tick();

        let duration = self.timer.initial_secs();
        let ticking = self.timer.is_running();
        if let Some(TimerEvent::Finished) = self.timer.on_tick() {
            let body = format!("{} timer finished", format_preset(duration));
            if signal_completion(self.notifier.as_mut(), &body) == Delivery::Alert {
                self.alert = Some(COMPLETION_SUMMARY.to_string());
                self.bell = true;
            }
            return true;
        }

        self.stopwatch.is_running() || ticking
    }

    /// Handle a key press. Returns true when the screen needs a redraw.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            self.should_quit = true;
            return false;
        }

        if self.alert.take().is_some() {
            return true;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = self.tab.next();
                return true;
            }
            _ => {}
        }

        match self.tab {
            Tab::Stopwatch => self.on_stopwatch_key(key),
            Tab::Timer if self.timer.shows_picker() => self.on_picker_key(key),
            Tab::Timer => self.on_countdown_key(key),
        }
    }

    fn on_stopwatch_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(' ') => self.stopwatch.toggle_start_stop(),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Char('r') => {
                self.stopwatch.lap_or_reset();
            }
            _ => return false,
        }
        true
    }

    fn on_picker_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.timer.start_or_resume();
            }
            KeyCode::Up => self.cycle_preset(false),
            KeyCode::Down => self.cycle_preset(true),
            KeyCode::Backspace => {
                self.timer_input.pop();
                self.selected_preset = None;
                self.timer.set_input(&self.timer_input);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.timer_input.push(c);
                self.selected_preset = None;
                self.timer.set_input(&self.timer_input);
            }
            _ => return false,
        }
        true
    }

    fn on_countdown_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.timer.toggle(),
            KeyCode::Char('r') | KeyCode::Backspace => self.timer.reset(),
            _ => return false,
        }
        true
    }
}
