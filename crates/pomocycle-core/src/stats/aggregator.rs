use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::Stats;
use crate::storage::SharedStore;

/// Source of the current local calendar day.
pub trait Today: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The system's local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalToday;

impl Today for LocalToday {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A fixed day, for replaying history and tests.
impl Today for NaiveDate {
    fn today(&self) -> NaiveDate {
        *self
    }
}

/// Folds completed focus sessions into the persisted [`Stats`] record.
#[derive(Clone)]
pub struct StatsAggregator {
    store: SharedStore,
    today: Arc<dyn Today>,
}

impl StatsAggregator {
    pub fn new(store: SharedStore, today: Arc<dyn Today>) -> Self {
        Self { store, today }
    }

    /// Aggregator that dates completions with the local calendar day.
    pub fn with_local_today(store: SharedStore) -> Self {
        Self::new(store, Arc::new(LocalToday))
    }

    /// Current calendar day as this aggregator sees it.
    pub fn today(&self) -> NaiveDate {
        self.today.today()
    }

    /// Stored counters as they read today.
    pub fn current(&self) -> Stats {
        self.store.load_stats().as_of(self.today.today())
    }

    /// Record one completed focus session and return the updated counters.
    ///
    /// A failed write is logged; the updated counters are returned either way.
    pub fn record_focus_completion(&self) -> Stats {
        let today = self.today.today();
        let updated = self.store.load_stats().record_focus(today);
        if let Err(e) = self.store.save_stats(&updated) {
            tracing::warn!(error = %e, "failed to persist stats after focus completion");
        }
        tracing::debug!(
            today = updated.today_pomodoros,
            total = updated.total_pomodoros,
            cycles = updated.completed_cycles,
            streak = updated.current_streak,
            "recorded focus completion"
        );
        updated
    }

    /// Clear all counters.
    pub fn reset(&self) -> crate::error::Result<Stats> {
        let cleared = Stats::default();
        self.store.save_stats(&cleared)?;
        Ok(cleared)
    }
}
