/// Stopwatch sampling period
pub const STOPWATCH_SAMPLE_MS: u64 = 10;
/// Countdown tick period
pub const TIMER_TICK_MS: u64 = 1000;

/// A recurring trigger polled by its owner.
///
/// Holding `Some(Interval)` is what makes an engine "scheduled"; dropping it
/// cancels the schedule. Polling never overlaps since the owner drives it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    period_ms: u64,
    next_due_ms: u64,
}

impl Interval {
    pub fn start(period_ms: u64, now_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Number of periods that came due since the last poll.
    pub fn fires(&mut self, now_ms: u64) -> u32 {
        if now_ms < self.next_due_ms {
            return 0;
        }
        let count = (now_ms - self.next_due_ms) / self.period_ms + 1;
        self.next_due_ms = self
            .next_due_ms
            .saturating_add(count.saturating_mul(self.period_ms));
        count.min(u32::MAX as u64) as u32
    }
}
