use clap::Subcommand;
use pomocycle_core::notify::{default_notifier, refusal_message, toggle_notifications, ToggleOutcome};
use pomocycle_core::{AppConfig, Store};

use super::open_store;

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// Ask for permission and turn phase notifications on
    Enable,
    /// Turn phase notifications off
    Disable,
    /// Print the platform permission and the stored setting
    Status,
}

pub fn run(action: NotificationsAction, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let notifier = default_notifier(&config.notifications);
    let mut settings = store.load_settings();

    match action {
        NotificationsAction::Enable => {
            let outcome = toggle_notifications(&mut settings, true, notifier.as_ref());
            // Saved either way; a refusal leaves the switch off.
            store.save_settings(&settings)?;
            match outcome {
                ToggleOutcome::Applied => println!("notifications enabled"),
                ToggleOutcome::Refused(permission) => println!("{}", refusal_message(permission)),
            }
        }
        NotificationsAction::Disable => {
            toggle_notifications(&mut settings, false, notifier.as_ref());
            store.save_settings(&settings)?;
            println!("notifications disabled");
        }
        NotificationsAction::Status => {
            let status = serde_json::json!({
                "permission": notifier.permission(),
                "enabled": settings.notifications_enabled,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}
