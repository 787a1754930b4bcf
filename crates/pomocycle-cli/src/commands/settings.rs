use clap::Subcommand;
use pomocycle_core::{AppConfig, DurationField, Settings, Store};

use super::open_store;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the stored settings as JSON
    Show,
    /// Change one setting
    Set {
        /// focusTime, shortBreak, longBreak (minutes) or soundEnabled,
        /// notificationsEnabled, autoStartBreaks, autoStartPomodoros, darkMode
        key: String,
        /// Minutes for durations, true/false for switches
        value: String,
    },
    /// Restore the default settings
    Reset,
}

/// Apply `value` to the setting named `key`.
///
/// Durations are given in minutes and go through the same fallback and
/// clamping as the interactive editor.
pub fn apply(settings: &mut Settings, key: &str, value: &str) -> Result<(), String> {
    if let Ok(field) = key.parse::<DurationField>() {
        settings.set_minutes(field, value);
        return Ok(());
    }
    let flag = match key {
        "soundEnabled" | "sound" => &mut settings.sound_enabled,
        "notificationsEnabled" | "notifications" => &mut settings.notifications_enabled,
        "autoStartBreaks" => &mut settings.auto_start_breaks,
        "autoStartPomodoros" => &mut settings.auto_start_pomodoros,
        "darkMode" => &mut settings.dark_mode,
        _ => return Err(format!("unknown setting: {key}")),
    };
    *flag = value
        .parse::<bool>()
        .map_err(|_| format!("expected true or false for {key}, got '{value}'"))?;
    Ok(())
}

pub fn run(action: SettingsAction, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&store.load_settings())?);
        }
        SettingsAction::Set { key, value } => {
            if matches!(key.as_str(), "notificationsEnabled" | "notifications") && value == "true" {
                return Err("use `pomocycle notifications enable` to turn on notifications".into());
            }
            let mut settings = store.load_settings();
            apply(&mut settings, &key, &value)?;
            store.save_settings(&settings)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Reset => {
            store.save_settings(&Settings::default())?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
