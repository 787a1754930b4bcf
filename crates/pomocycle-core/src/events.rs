use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::NotificationContent;
use crate::sound::Tone;
use crate::stats::Stats;
use crate::timer::Phase;

/// Every state change of the session produces an Event.
///
/// The state machine returns them from each operation; the runtime
/// broadcasts them and the effects layer turns them into notifications,
/// sounds and the celebration banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        time_left: u32,
        at: DateTime<Utc>,
    },
    /// Whole session reinitialized to its creation state.
    CycleReset {
        at: DateTime<Utc>,
    },
    /// A focus phase finished and was recorded.
    FocusCompleted {
        completed_pomodoros: u32,
        cycle_position: u8,
        stats: Stats,
        at: DateTime<Utc>,
    },
    /// The fourth focus session of a cycle finished.
    CycleCompleted {
        success_sound: bool,
        at: DateTime<Utc>,
    },
    /// A new phase began. `notification` and `tone` are present only when
    /// the corresponding setting was on at the transition.
    PhaseEntered {
        phase: Phase,
        duration_secs: u32,
        auto_started: bool,
        notification: Option<NotificationContent>,
        tone: Option<Tone>,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        time_left: u32,
        at: DateTime<Utc>,
    },
}
