use crate::clock::Clock;
use crate::duration::{format_preset, parse_duration};
use crate::format::{format_countdown, remaining_phrase};
use crate::schedule::{Interval, TIMER_TICK_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown reached zero; the engine has already reset itself
    Finished,
}

/// Countdown engine ticking once per second.
///
/// `configured_secs` comes from the duration input and survives resets.
/// `remaining_secs`/`initial_secs` are only seeded when starting from zero.
#[derive(Debug)]
pub struct Timer<C: Clock> {
    clock: C,
    schedule: Option<Interval>,
    remaining_secs: u64,
    initial_secs: u64,
    configured_secs: u64,
}

impl<C: Clock> Timer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            schedule: None,
            remaining_secs: 0,
            initial_secs: 0,
            configured_secs: 0,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        if self.schedule.is_some() {
            TimerPhase::Running
        } else if self.remaining_secs > 0 {
            TimerPhase::Paused
        } else {
            TimerPhase::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    /// The duration picker is shown whenever there is no countdown in flight
    pub fn shows_picker(&self) -> bool {
        self.phase() == TimerPhase::Idle
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn initial_secs(&self) -> u64 {
        self.initial_secs
    }

    pub fn configured_secs(&self) -> u64 {
        self.configured_secs
    }

    /// Parse free-text input into the configured duration.
    pub fn set_input(&mut self, text: &str) -> u64 {
        self.configured_secs = parse_duration(text);
        self.configured_secs
    }

    /// Configure a preset and return the text that should fill the input.
    pub fn select_preset(&mut self, seconds: u64) -> String {
        let text = format_preset(seconds);
        self.set_input(&text);
        text
    }

    /// Start from the configured duration, or resume a paused countdown.
    /// Returns false when there is nothing to count down.
    pub fn start_or_resume(&mut self) -> bool {
        if self.is_running() {
            return true;
        }

        if self.remaining_secs == 0 {
            self.remaining_secs = self.configured_secs;
            self.initial_secs = self.configured_secs;
        }
        if self.remaining_secs == 0 {
            tracing::debug!("timer start refused, no duration configured");
            return false;
        }

        self.schedule = Some(Interval::start(TIMER_TICK_MS, self.clock.now_millis()));
        tracing::debug!(remaining = self.remaining_secs, "timer running");
        true
    }

    /// Stop ticking but keep the remaining time. Ignored unless running.
    pub fn pause(&mut self) {
        if self.schedule.take().is_some() {
            tracing::debug!(remaining = self.remaining_secs, "timer paused");
        }
    }

    /// The start/pause control
    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start_or_resume();
        }
    }

    /// Cancel the countdown and return to the picker.
    pub fn reset(&mut self) {
        self.schedule = None;
        self.remaining_secs = 0;
        self.initial_secs = 0;
        tracing::debug!("timer reset");
    }

    /// Count down one second; on reaching zero the timer stops and resets.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        tracing::info!(duration = self.initial_secs, "timer finished");
        self.reset();
        Some(TimerEvent::Finished)
    }

    /// Poll the tick schedule, running one tick per elapsed second.
    pub fn on_tick(&mut self) -> Option<TimerEvent> {
        let now = self.clock.now_millis();
        let due = match self.schedule.as_mut() {
            Some(schedule) => schedule.fires(now),
            None => return None,
        };

        for _ in 0..due {
            if let Some(event) = self.tick() {
                return Some(event);
            }
        }
        None
    }

    /// Fraction of the countdown left, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.initial_secs == 0 {
            return 0.0;
        }
        (self.remaining_secs as f64 / self.initial_secs as f64).clamp(0.0, 1.0)
    }

    pub fn remaining_phrase(&self) -> String {
        remaining_phrase(self.remaining_secs)
    }

    pub fn display(&self) -> String {
        format_countdown(self.remaining_secs)
    }

    /// Countdown string for the configured duration, shown under the input
    pub fn preview(&self) -> String {
        format_countdown(self.configured_secs)
    }
}
