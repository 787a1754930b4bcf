use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::timer::CYCLE_LENGTH;

/// Persisted `stats` record.
///
/// Only focus completions change it. Missing fields deserialize to their
/// defaults, so the record stays readable across schema additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub today_pomodoros: u32,
    pub completed_cycles: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_pomodoros: u32,
    /// Local calendar day of the last recorded focus completion.
    pub last_session_date: Option<NaiveDate>,
}

impl Stats {
    /// Fold one completed focus session recorded on `today` into the counters.
    ///
    /// `today_pomodoros` restarts from zero when the stored day differs from
    /// `today`. The streak grows by one for every completion recorded on the
    /// same day as the previous one and restarts at 1 otherwise, so it counts
    /// sessions, not days.
    pub fn record_focus(&self, today: NaiveDate) -> Stats {
        let same_day = self.last_session_date == Some(today);
        let mut next = *self;

        if !same_day {
            next.today_pomodoros = 0;
        }
        next.today_pomodoros = next.today_pomodoros.saturating_add(1);
        next.total_pomodoros = next.total_pomodoros.saturating_add(1);
        if next.today_pomodoros % u32::from(CYCLE_LENGTH) == 0 {
            next.completed_cycles = next.completed_cycles.saturating_add(1);
        }

        next.current_streak = if same_day {
            next.current_streak.saturating_add(1)
        } else {
            1
        };
        next.longest_streak = next.longest_streak.max(next.current_streak);
        next.last_session_date = Some(today);
        next
    }

    /// Counters as they should be displayed on `today`.
    ///
    /// A stale `today_pomodoros` reads as zero. Nothing else changes, and
    /// `last_session_date` keeps the stored day so the next recorded
    /// completion still sees the rollover.
    pub fn as_of(&self, today: NaiveDate) -> Stats {
        let mut view = *self;
        if self.last_session_date != Some(today) {
            view.today_pomodoros = 0;
        }
        view
    }
}
