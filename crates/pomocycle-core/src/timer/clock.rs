use std::future;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Periodic tick source that only runs while resumed.
///
/// Resuming creates a fresh interval whose first tick lands one full period
/// later, so a pause never shortens the next second.
#[derive(Debug)]
pub struct Clock {
    period: Duration,
    interval: Option<Interval>,
}

impl Clock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Begin emitting ticks. No-op while already active.
    pub fn resume(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    /// Stop emitting ticks. No-op while already suspended.
    pub fn suspend(&mut self) {
        self.interval = None;
    }

    /// Match the clock to the machine's run state.
    pub fn follow(&mut self, running: bool) {
        if running {
            self.resume();
        } else {
            self.suspend();
        }
    }

    /// Wait for the next tick. Pending forever while suspended.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}
