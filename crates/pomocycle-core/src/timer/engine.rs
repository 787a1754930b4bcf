//! Session state machine.
//!
//! The engine owns the countdown and the position in the 4-session cycle.
//! It does no I/O of its own apart from recording focus completions through
//! the [`StatsAggregator`]; every other side effect is returned as an
//! [`Event`] for the caller to act on.
//!
//! ## State Transitions
//!
//! ```text
//! Focus(pos 0..2) -> ShortBreak -> Focus(pos + 1)
//! Focus(pos 3)    -> LongBreak  -> Focus(pos 0)
//! ```
//!
//! Each phase is either running or paused. Ticks only count down while
//! running.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(settings, aggregator);
//! engine.start();
//! // Once per second:
//! let events = engine.tick();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::phase::{duration_of, next_phase, Phase, CYCLE_LENGTH};
use crate::events::Event;
use crate::notify::notification_for;
use crate::settings::Settings;
use crate::sound::Tone;
use crate::stats::{Stats, StatsAggregator};

/// Observable state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub is_running: bool,
    /// Seconds left in the current phase.
    pub time_left: u32,
    pub current_phase: Phase,
    /// Focus sessions finished in the current cycle, 0..=3.
    pub cycle_position: u8,
    /// Focus sessions finished since the engine was created.
    pub completed_pomodoros: u32,
}

impl SessionState {
    /// State at creation: paused at the start of the first focus session.
    pub fn initial(settings: &Settings) -> Self {
        Self {
            is_running: false,
            time_left: duration_of(Phase::Focus, settings),
            current_phase: Phase::Focus,
            cycle_position: 0,
            completed_pomodoros: 0,
        }
    }

    /// `time_left` as `mm:ss`.
    pub fn clock(&self) -> String {
        format_clock(self.time_left)
    }

    /// Window-title style summary, e.g. `🍅 25:00 - Pomodoro Timer`.
    pub fn title(&self) -> String {
        format!("{} {} - Pomodoro Timer", self.current_phase.emoji(), self.clock())
    }
}

/// Format seconds as zero-padded `mm:ss`. Minutes are not wrapped at 60.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Core session state machine.
pub struct SessionEngine {
    state: SessionState,
    settings: Settings,
    stats: StatsAggregator,
    last_stats: Stats,
}

impl SessionEngine {
    /// Create an engine paused at the start of a focus session.
    pub fn new(settings: Settings, stats: StatsAggregator) -> Self {
        let last_stats = stats.current();
        Self {
            state: SessionState::initial(&settings),
            settings,
            stats,
            last_stats,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Counters from the last recorded focus completion (or creation),
    /// read as of the current day.
    pub fn stats(&self) -> Stats {
        self.last_stats.as_of(self.stats.today())
    }

    /// Configured length of the current phase.
    pub fn phase_duration(&self) -> u32 {
        duration_of(self.state.current_phase, &self.settings)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        if self.state.is_running {
            return Vec::new();
        }
        self.state.is_running = true;
        tracing::debug!(phase = ?self.state.current_phase, time_left = self.state.time_left, "timer started");
        vec![Event::TimerStarted {
            phase: self.state.current_phase,
            time_left: self.state.time_left,
            at: Utc::now(),
        }]
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if !self.state.is_running {
            return Vec::new();
        }
        self.state.is_running = false;
        tracing::debug!(phase = ?self.state.current_phase, time_left = self.state.time_left, "timer paused");
        vec![Event::TimerPaused {
            phase: self.state.current_phase,
            time_left: self.state.time_left,
            at: Utc::now(),
        }]
    }

    /// Start when paused, pause when running.
    pub fn toggle(&mut self) -> Vec<Event> {
        if self.state.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stop and reload the full length of the current phase.
    pub fn reset(&mut self) -> Vec<Event> {
        self.state.is_running = false;
        self.state.time_left = self.phase_duration();
        vec![Event::TimerReset {
            phase: self.state.current_phase,
            time_left: self.state.time_left,
            at: Utc::now(),
        }]
    }

    /// Return to the creation state: first focus session, paused, no
    /// completed pomodoros. Persisted stats are untouched.
    pub fn reset_cycle(&mut self) -> Vec<Event> {
        self.state = SessionState::initial(&self.settings);
        vec![Event::CycleReset { at: Utc::now() }]
    }

    /// Advance the countdown by one second. Ignored while paused.
    ///
    /// The countdown never rests at zero: the tick that would reach it
    /// completes the phase instead.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.state.is_running {
            return Vec::new();
        }
        if self.state.time_left > 1 {
            self.state.time_left -= 1;
            Vec::new()
        } else {
            self.complete_phase()
        }
    }

    /// Complete the current phase now, running or not.
    pub fn skip(&mut self) -> Vec<Event> {
        self.complete_phase()
    }

    /// Replace the settings. A paused countdown is reloaded from the new
    /// duration of the current phase; a running one continues untouched.
    pub fn update_settings(&mut self, settings: Settings) -> Vec<Event> {
        self.settings = settings;
        if !self.state.is_running {
            self.state.time_left = self.phase_duration();
        }
        vec![Event::SettingsApplied {
            time_left: self.state.time_left,
            at: Utc::now(),
        }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let completed = self.state.current_phase;
        let position_before = self.state.cycle_position;
        let now = Utc::now();

        if completed == Phase::Focus {
            self.state.completed_pomodoros = self.state.completed_pomodoros.saturating_add(1);
            self.state.cycle_position = (position_before + 1) % CYCLE_LENGTH;
            self.last_stats = self.stats.record_focus_completion();
            events.push(Event::FocusCompleted {
                completed_pomodoros: self.state.completed_pomodoros,
                cycle_position: self.state.cycle_position,
                stats: self.last_stats,
                at: now,
            });
            if self.state.cycle_position == 0 {
                tracing::info!(completed = self.state.completed_pomodoros, "cycle completed");
                events.push(Event::CycleCompleted {
                    success_sound: self.settings.sound_enabled,
                    at: now,
                });
            }
        }

        let next = next_phase(completed, position_before);
        self.state.current_phase = next;
        self.state.time_left = duration_of(next, &self.settings);
        self.state.is_running = if next.is_break() {
            self.settings.auto_start_breaks
        } else {
            self.settings.auto_start_pomodoros
        };

        tracing::info!(from = ?completed, to = ?next, auto_started = self.state.is_running, "phase completed");
        events.push(Event::PhaseEntered {
            phase: next,
            duration_secs: self.state.time_left,
            auto_started: self.state.is_running,
            notification: self
                .settings
                .notifications_enabled
                .then(|| notification_for(next)),
            tone: self.settings.sound_enabled.then(|| Tone::entering(next)),
            at: now,
        });
        events
    }
}
