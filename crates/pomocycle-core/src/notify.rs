//! Phase-change notifications.
//!
//! [`notification_for`] holds the literal title/body for each phase. A
//! [`Notifier`] displays them; it never reports failure back into the timer.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::settings::Settings;
use crate::timer::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

/// Title and body announcing that `phase` has begun.
pub fn notification_for(phase: Phase) -> NotificationContent {
    let (title, body) = match phase {
        Phase::Focus => ("Focus Time! 🍅", "Time to concentrate and get things done!"),
        Phase::ShortBreak => ("Short Break 🌱", "Take a few minutes to relax and recharge."),
        Phase::LongBreak => (
            "Long Break 🎉",
            "Great job! You've completed a full cycle. Take a well-deserved break.",
        ),
    };
    NotificationContent {
        title: title.to_string(),
        body: body.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// No notification service on this platform or build.
    Unsupported,
}

pub trait Notifier: Send + Sync {
    fn permission(&self) -> Permission;

    /// Ask the platform for permission. Already-decided permissions are
    /// returned as-is.
    fn request_permission(&self) -> Permission {
        self.permission()
    }

    fn show(&self, content: &NotificationContent) -> Result<()>;
}

/// Notifier for builds or hosts without a notification service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn permission(&self) -> Permission {
        Permission::Unsupported
    }

    fn show(&self, _content: &NotificationContent) -> Result<()> {
        Ok(())
    }
}

/// Native desktop notifications.
#[cfg(feature = "desktop-notify")]
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    timeout_ms: u32,
}

#[cfg(feature = "desktop-notify")]
impl DesktopNotifier {
    pub fn new(config: &crate::storage::NotificationsConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            timeout_ms: config.timeout_ms,
        }
    }
}

#[cfg(feature = "desktop-notify")]
impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        // Desktop notification services have no per-app permission prompt.
        Permission::Granted
    }

    fn show(&self, content: &NotificationContent) -> Result<()> {
        notify_rust::Notification::new()
            .appname(&self.app_name)
            .summary(&content.title)
            .body(&content.body)
            .timeout(notify_rust::Timeout::Milliseconds(self.timeout_ms))
            .show()
            .map(|_| ())
            .map_err(|e| crate::error::CoreError::Custom(format!("notification failed: {e}")))
    }
}

/// Best notifier this build supports.
pub fn default_notifier(config: &crate::storage::NotificationsConfig) -> std::sync::Arc<dyn Notifier> {
    #[cfg(feature = "desktop-notify")]
    {
        std::sync::Arc::new(DesktopNotifier::new(config))
    }
    #[cfg(not(feature = "desktop-notify"))]
    {
        let _ = config;
        std::sync::Arc::new(NullNotifier)
    }
}

/// Result of flipping the notifications toggle in the settings editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied,
    /// Permission was not granted; the toggle stays off. The caller shows a
    /// one-time alert.
    Refused(Permission),
}

/// Turn notifications on or off in `settings`, asking for permission when
/// turning them on.
pub fn toggle_notifications(
    settings: &mut Settings,
    enabled: bool,
    notifier: &dyn Notifier,
) -> ToggleOutcome {
    if enabled {
        let permission = notifier.request_permission();
        if permission != Permission::Granted {
            tracing::info!(?permission, "notification permission not granted");
            settings.notifications_enabled = false;
            return ToggleOutcome::Refused(permission);
        }
    }
    settings.notifications_enabled = enabled;
    ToggleOutcome::Applied
}

/// Alert text shown once when enabling notifications is refused.
pub fn refusal_message(permission: Permission) -> &'static str {
    match permission {
        Permission::Unsupported => "Notifications are not supported on this system.",
        _ => "Notifications were denied. Please enable them in your system settings.",
    }
}
