use std::time::{Duration, Instant};

/// Backlog beyond this many frames is dropped rather than replayed.
const MAX_BACKLOG: u32 = 3;

/// Fixed-rate tick source for the main loop.
pub struct FrameClock {
    period: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(frame_rate: u32, now: Instant) -> Self {
        Self {
            period: Duration::from_secs(1) / frame_rate.max(1),
            next: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left before the next tick is due; zero when it already is.
    pub fn until_next_tick(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Consumes one due tick. Returns false if none is due yet.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }

        self.next += self.period;
        if now.saturating_duration_since(self.next) > self.period * MAX_BACKLOG {
            self.next = now + self.period;
        }
        true
    }
}
