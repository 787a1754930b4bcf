//! User-editable timer settings.
//!
//! Durations are stored in seconds. The settings editor works in whole
//! minutes and converts at the boundary; see [`DurationField`].

use std::num::IntErrorKind;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Allowed long-break length in minutes, enforced by the editor only.
pub const LONG_BREAK_MINUTES: RangeInclusive<u32> = 15..=30;

/// Persisted `settings` record.
///
/// Missing fields deserialize to their defaults so older records keep
/// loading after new fields are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Focus length in seconds.
    pub focus_time: u32,
    /// Short break length in seconds.
    pub short_break: u32,
    /// Long break length in seconds.
    pub long_break: u32,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_time: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
            sound_enabled: true,
            notifications_enabled: false,
            auto_start_breaks: true,
            auto_start_pomodoros: true,
            dark_mode: false,
        }
    }
}

/// One of the three duration fields as presented by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DurationField {
    Focus,
    ShortBreak,
    LongBreak,
}

impl DurationField {
    /// Minutes used when the typed value is not a positive number.
    pub fn fallback_minutes(self) -> u32 {
        match self {
            DurationField::Focus => 25,
            DurationField::ShortBreak => 5,
            DurationField::LongBreak => 15,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationField::Focus => "Focus Time (minutes)",
            DurationField::ShortBreak => "Short Break (minutes)",
            DurationField::LongBreak => "Long Break (15-30 minutes)",
        }
    }

    /// Interpret free-form editor input as whole minutes.
    ///
    /// Leading digits are taken (`"12min"` is 12); a number too large for
    /// `u32` saturates. Anything that yields no positive number falls back
    /// to [`fallback_minutes`](Self::fallback_minutes).
    /// The long break is additionally clamped to [`LONG_BREAK_MINUTES`].
    pub fn parse_minutes(self, input: &str) -> u32 {
        let digits: String = input
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let minutes = match digits.parse::<u32>() {
            Ok(n) if n > 0 => n,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => u32::MAX,
            _ => self.fallback_minutes(),
        };
        match self {
            DurationField::LongBreak => {
                minutes.clamp(*LONG_BREAK_MINUTES.start(), *LONG_BREAK_MINUTES.end())
            }
            _ => minutes,
        }
    }
}

impl FromStr for DurationField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "focus" | "focus-time" | "focustime" => Ok(DurationField::Focus),
            "short" | "short-break" | "shortbreak" => Ok(DurationField::ShortBreak),
            "long" | "long-break" | "longbreak" => Ok(DurationField::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: format!("unknown duration field '{other}'"),
            }),
        }
    }
}

impl Settings {
    /// Seconds stored for a duration field.
    pub fn seconds(&self, field: DurationField) -> u32 {
        match field {
            DurationField::Focus => self.focus_time,
            DurationField::ShortBreak => self.short_break,
            DurationField::LongBreak => self.long_break,
        }
    }

    /// Whole minutes as shown by the editor (truncating).
    pub fn minutes(&self, field: DurationField) -> u32 {
        self.seconds(field) / 60
    }

    /// Apply editor input for a duration field, converting minutes to seconds.
    pub fn set_minutes(&mut self, field: DurationField, input: &str) {
        let secs = field.parse_minutes(input).saturating_mul(60);
        match field {
            DurationField::Focus => self.focus_time = secs,
            DurationField::ShortBreak => self.short_break = secs,
            DurationField::LongBreak => self.long_break = secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let s = Settings::default();
        assert_eq!(s.focus_time, 1500);
        assert_eq!(s.short_break, 300);
        assert_eq!(s.long_break, 900);
        assert!(s.sound_enabled);
        assert!(!s.notifications_enabled);
        assert!(s.auto_start_breaks && s.auto_start_pomodoros);
        assert!(!s.dark_mode);
    }

    #[test]
    fn partial_record_merges_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"focusTime": 600, "darkMode": true}"#).unwrap();
        assert_eq!(s.focus_time, 600);
        assert!(s.dark_mode);
        assert_eq!(s.short_break, 300);
        assert!(s.sound_enabled);
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json.get("autoStartPomodoros").is_some());
        assert!(json.get("auto_start_pomodoros").is_none());
    }

    #[test]
    fn non_numeric_minutes_fall_back() {
        assert_eq!(DurationField::Focus.parse_minutes("abc"), 25);
        assert_eq!(DurationField::ShortBreak.parse_minutes(""), 5);
        assert_eq!(DurationField::LongBreak.parse_minutes("0"), 15);
        assert_eq!(DurationField::Focus.parse_minutes("40min"), 40);
    }

    #[test]
    fn long_break_minutes_are_clamped() {
        assert_eq!(DurationField::LongBreak.parse_minutes("5"), 15);
        assert_eq!(DurationField::LongBreak.parse_minutes("45"), 30);
        assert_eq!(DurationField::LongBreak.parse_minutes("20"), 20);
    }

    #[test]
    fn oversized_minutes_saturate() {
        assert_eq!(DurationField::Focus.parse_minutes("99999999999"), u32::MAX);
        assert_eq!(DurationField::ShortBreak.parse_minutes("4294967296min"), u32::MAX);
        assert_eq!(DurationField::LongBreak.parse_minutes("99999999999"), 30);

        let mut s = Settings::default();
        s.set_minutes(DurationField::Focus, "99999999999");
        assert_eq!(s.focus_time, u32::MAX);
    }

    #[test]
    fn set_minutes_converts_to_seconds() {
        let mut s = Settings::default();
        s.set_minutes(DurationField::Focus, "50");
        s.set_minutes(DurationField::LongBreak, "99");
        assert_eq!(s.focus_time, 3000);
        assert_eq!(s.long_break, 1800);
        assert_eq!(s.minutes(DurationField::Focus), 50);
    }

    #[test]
    fn duration_field_parses_aliases() {
        assert_eq!("short_break".parse::<DurationField>().unwrap(), DurationField::ShortBreak);
        assert_eq!("Long".parse::<DurationField>().unwrap(), DurationField::LongBreak);
        assert!("lunch".parse::<DurationField>().is_err());
    }
}
