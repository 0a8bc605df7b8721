use crate::clock::Clock;
use crate::format::format_stopwatch;
use crate::schedule::{Interval, STOPWATCH_SAMPLE_MS};

/// One recorded lap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LapRecord {
    /// 1-based, never reused until an explicit reset
    pub index: u32,
    /// Time since the previous lap (or since zero for the first lap)
    pub split_millis: u64,
    /// Total elapsed time when the lap was taken
    pub cumulative_millis: u64,
}

/// What the combined lap/reset control did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LapOrReset {
    Lap(LapRecord),
    Reset,
}

/// Elapsed-time engine sampled every [`STOPWATCH_SAMPLE_MS`] while running.
#[derive(Debug)]
pub struct Stopwatch<C: Clock> {
    clock: C,
    schedule: Option<Interval>,
    elapsed_millis: u64,
    anchor_millis: u64,
    laps: Vec<LapRecord>,
    next_lap: u32,
}

impl<C: Clock> Stopwatch<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            schedule: None,
            elapsed_millis: 0,
            anchor_millis: 0,
            laps: Vec::new(),
            next_lap: 1,
        }
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }

    /// Laps in the order they were recorded
    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn laps_newest_first(&self) -> impl Iterator<Item = &LapRecord> {
        self.laps.iter().rev()
    }

    pub fn display(&self) -> String {
        format_stopwatch(self.elapsed_millis)
    }

    /// Start counting, resuming from any accumulated time, or stop and keep
    /// the last sampled value.
    pub fn toggle_start_stop(&mut self) {
        if self.schedule.take().is_some() {
            tracing::debug!(elapsed_ms = self.elapsed_millis, "stopwatch stopped");
            return;
        }

        let now = self.clock.now_millis();
        self.anchor_millis = now.saturating_sub(self.elapsed_millis);
        self.schedule = Some(Interval::start(STOPWATCH_SAMPLE_MS, now));
        tracing::debug!(elapsed_ms = self.elapsed_millis, "stopwatch started");
    }

    /// Poll the sampling schedule; recomputes elapsed time when a sample is due.
    pub fn on_tick(&mut self) {
        let now = self.clock.now_millis();
        if let Some(schedule) = self.schedule.as_mut() {
            if schedule.fires(now) > 0 {
                self.elapsed_millis = now.saturating_sub(self.anchor_millis);
            }
        }
    }

    /// Append a lap at the current elapsed time. Ignored while stopped.
    pub fn record_lap(&mut self) -> Option<LapRecord> {
        if !self.is_running() {
            return None;
        }

        let cumulative_millis = self.elapsed_millis;
        let previous = self.laps.last().map_or(0, |lap| lap.cumulative_millis);
        let lap = LapRecord {
            index: self.next_lap,
            split_millis: cumulative_millis.saturating_sub(previous),
            cumulative_millis,
        };
        self.laps.push(lap);
        self.next_lap += 1;
        tracing::debug!(index = lap.index, split_ms = lap.split_millis, "lap recorded");
        Some(lap)
    }

    /// Clear elapsed time and laps. Refused while running.
    pub fn reset(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        self.elapsed_millis = 0;
        self.anchor_millis = 0;
        self.laps.clear();
        self.next_lap = 1;
        tracing::debug!("stopwatch reset");
        true
    }

    /// The single lap/reset control: laps while running, resets while stopped.
    pub fn lap_or_reset(&mut self) -> LapOrReset {
        match self.record_lap() {
            Some(lap) => LapOrReset::Lap(lap),
            None => {
                self.reset();
                LapOrReset::Reset
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use assert_matches::assert_matches;

    fn fixture() -> (Stopwatch<ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        (Stopwatch::new(clock.clone()), clock)
    }

    #[test]
    fn samples_elapsed_time_while_running() {
        let (mut sw, clock) = fixture();
        sw.toggle_start_stop();
        assert!(sw.is_running());

        clock.advance(1_234);
        sw.on_tick();
        assert_eq!(sw.elapsed_millis(), 1_234);
        assert_eq!(sw.display(), "00:00:01.23");
    }

    #[test]
    fn no_sample_before_first_period() {
        let (mut sw, clock) = fixture();
        sw.toggle_start_stop();
        clock.advance(5);
        sw.on_tick();
        assert_eq!(sw.elapsed_millis(), 0);
    }

    #[test]
    fn stop_freezes_last_sample_and_resume_continues() {
        let (mut sw, clock) = fixture();
        sw.toggle_start_stop();
        clock.advance(500);
        sw.on_tick();

        sw.toggle_start_stop();
        assert!(!sw.is_running());

        // time passing while stopped is not counted
        clock.advance(10_000);
        sw.on_tick();
        assert_eq!(sw.elapsed_millis(), 500);

        sw.toggle_start_stop();
        clock.advance(300);
        sw.on_tick();
        assert_eq!(sw.elapsed_millis(), 800);
    }

    #[test]
    fn laps_track_splits_and_indices() {
        let (mut sw, clock) = fixture();
        sw.toggle_start_stop();

        clock.advance(1_500);
        sw.on_tick();
        let first = sw.record_lap().unwrap();

        clock.advance(2_250);
        sw.on_tick();
        let second = sw.record_lap().unwrap();

        assert_eq!(first.index, 1);
        assert_eq!(first.split_millis, 1_500);
        assert_eq!(second.index, 2);
        assert_eq!(second.cumulative_millis, 3_750);
        assert_eq!(
            second.split_millis,
            second.cumulative_millis - first.cumulative_millis
        );

        let newest: Vec<u32> = sw.laps_newest_first().map(|l| l.index).collect();
        assert_eq!(newest, vec![2, 1]);
    }

    #[test]
    fn lap_ignored_while_stopped() {
        let (mut sw, _clock) = fixture();
        assert_eq!(sw.record_lap(), None);
        assert!(sw.laps().is_empty());
    }

    #[test]
    fn lap_indices_continue_across_stop_and_resume() {
        let (mut sw, clock) = fixture();
        sw.toggle_start_stop();
        clock.advance(100);
        sw.on_tick();
        sw.record_lap();

        sw.toggle_start_stop();
        sw.toggle_start_stop();
        clock.advance(100);
        sw.on_tick();
        let lap = sw.record_lap().unwrap();
        assert_eq!(lap.index, 2);
        assert_eq!(lap.split_millis, 100);
    }

    #[test]
    fn reset_refused_while_running() {
        let (mut sw, clock) = fixture();
        sw.toggle_start_stop();
        clock.advance(100);
        sw.on_tick();
        assert!(!sw.reset());
        assert_eq!(sw.elapsed_millis(), 100);
    }

    #[test]
    fn reset_clears_laps_and_restarts_numbering() {
        let (mut sw, clock) = fixture();
        sw.toggle_start_stop();
        clock.advance(100);
        sw.on_tick();
        sw.record_lap();
        sw.record_lap();
        sw.toggle_start_stop();

        assert!(sw.reset());
        assert_eq!(sw.elapsed_millis(), 0);
        assert!(sw.laps().is_empty());

        sw.toggle_start_stop();
        clock.advance(20);
        sw.on_tick();
        assert_eq!(sw.record_lap().unwrap().index, 1);
    }

    #[test]
    fn lap_or_reset_dispatches_on_run_state() {
        let (mut sw, clock) = fixture();
        sw.toggle_start_stop();
        clock.advance(40);
        sw.on_tick();

        assert_matches!(sw.lap_or_reset(), LapOrReset::Lap(LapRecord { index: 1, .. }));
        assert_eq!(sw.laps().len(), 1);

        sw.toggle_start_stop();
        assert_matches!(sw.lap_or_reset(), LapOrReset::Reset);
        assert!(sw.laps().is_empty());
        assert_eq!(sw.elapsed_millis(), 0);
    }
}
