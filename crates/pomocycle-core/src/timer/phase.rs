use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Number of focus sessions in one full cycle. The fourth focus session of
/// a cycle is followed by a long break.
pub const CYCLE_LENGTH: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Focus)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Phase::Focus => "🍅",
            Phase::ShortBreak => "🌱",
            Phase::LongBreak => "🎉",
        }
    }
}

/// Configured length of `phase` in seconds.
pub fn duration_of(phase: Phase, settings: &Settings) -> u32 {
    match phase {
        Phase::Focus => settings.focus_time,
        Phase::ShortBreak => settings.short_break,
        Phase::LongBreak => settings.long_break,
    }
}

/// Phase that follows `current`.
///
/// `cycle_position` is the position held while `current` was in progress,
/// i.e. before a completed focus session is counted. Position 3 is the last
/// focus session of a cycle and routes to the long break.
pub fn next_phase(current: Phase, cycle_position: u8) -> Phase {
    match current {
        Phase::Focus if cycle_position == CYCLE_LENGTH - 1 => Phase::LongBreak,
        Phase::Focus => Phase::ShortBreak,
        Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_follow_settings() {
        let s = Settings {
            focus_time: 10,
            short_break: 20,
            long_break: 30,
            ..Settings::default()
        };
        assert_eq!(duration_of(Phase::Focus, &s), 10);
        assert_eq!(duration_of(Phase::ShortBreak, &s), 20);
        assert_eq!(duration_of(Phase::LongBreak, &s), 30);
    }

    #[test]
    fn focus_routes_to_short_break_until_last_position() {
        for pos in 0..3 {
            assert_eq!(next_phase(Phase::Focus, pos), Phase::ShortBreak);
        }
        assert_eq!(next_phase(Phase::Focus, 3), Phase::LongBreak);
    }

    #[test]
    fn breaks_always_return_to_focus() {
        for pos in 0..4 {
            assert_eq!(next_phase(Phase::ShortBreak, pos), Phase::Focus);
            assert_eq!(next_phase(Phase::LongBreak, pos), Phase::Focus);
        }
    }

    #[test]
    fn phase_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&Phase::ShortBreak).unwrap(), "\"shortBreak\"");
        assert!(Phase::LongBreak.is_break());
        assert!(!Phase::Focus.is_break());
    }
}
