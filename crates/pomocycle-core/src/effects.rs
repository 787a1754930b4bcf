//! Carries out the external side effects announced by session events.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::events::Event;
use crate::notify::Notifier;
use crate::sound::{SoundPlayer, Tone};

/// Notifications and sounds for session events.
///
/// Failures are logged and dropped; nothing flows back into the session.
#[derive(Clone)]
pub struct Effects {
    notifier: Arc<dyn Notifier>,
    sound: Arc<dyn SoundPlayer>,
}

impl Effects {
    pub fn new(notifier: Arc<dyn Notifier>, sound: Arc<dyn SoundPlayer>) -> Self {
        Self { notifier, sound }
    }

    /// Perform the effects of one event on the calling thread.
    pub fn apply(&self, event: &Event) {
        match event {
            Event::PhaseEntered {
                notification, tone, ..
            } => {
                if let Some(content) = notification {
                    if let Err(e) = self.notifier.show(content) {
                        tracing::warn!(error = %e, title = %content.title, "failed to show notification");
                    }
                }
                if let Some(tone) = tone {
                    self.play(*tone);
                }
            }
            Event::CycleCompleted {
                success_sound: true,
                ..
            } => self.play(Tone::Success),
            _ => {}
        }
    }

    fn play(&self, tone: Tone) {
        if let Err(e) = self.sound.play(tone) {
            tracing::warn!(error = %e, ?tone, "failed to play sound");
        }
    }

    /// Apply every event from `events` until the channel closes.
    ///
    /// Players and notifiers may block, so each event is handled on the
    /// blocking pool.
    pub fn spawn(self, mut events: broadcast::Receiver<Event>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let effects = self.clone();
                        if let Err(e) = tokio::task::spawn_blocking(move || effects.apply(&event)).await {
                            tracing::warn!(error = %e, "effect task failed");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "effects fell behind; events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::error::{CoreError, Result};
    use crate::notify::{notification_for, NotificationContent, Permission};
    use crate::timer::Phase;

    #[derive(Default)]
    struct Recorder {
        shown: Mutex<Vec<String>>,
        played: Mutex<Vec<Tone>>,
        fail: bool,
    }

    impl Notifier for Recorder {
        fn permission(&self) -> Permission {
            Permission::Granted
        }
        fn show(&self, content: &NotificationContent) -> Result<()> {
            self.shown.lock().unwrap().push(content.title.clone());
            if self.fail {
                return Err(CoreError::Custom("no service".into()));
            }
            Ok(())
        }
    }

    impl SoundPlayer for Recorder {
        fn play(&self, tone: Tone) -> Result<()> {
            self.played.lock().unwrap().push(tone);
            if self.fail {
                return Err(CoreError::Custom("no device".into()));
            }
            Ok(())
        }
    }

    fn effects(recorder: &Arc<Recorder>) -> Effects {
        Effects::new(recorder.clone(), recorder.clone())
    }

    #[test]
    fn phase_entered_shows_and_plays() {
        let recorder = Arc::new(Recorder::default());
        effects(&recorder).apply(&Event::PhaseEntered {
            phase: Phase::LongBreak,
            duration_secs: 900,
            auto_started: true,
            notification: Some(notification_for(Phase::LongBreak)),
            tone: Some(Tone::Break),
            at: Utc::now(),
        });
        assert_eq!(*recorder.shown.lock().unwrap(), vec!["Long Break 🎉".to_string()]);
        assert_eq!(*recorder.played.lock().unwrap(), vec![Tone::Break]);
    }

    #[test]
    fn success_sound_only_when_flagged() {
        let recorder = Arc::new(Recorder::default());
        let fx = effects(&recorder);
        fx.apply(&Event::CycleCompleted {
            success_sound: false,
            at: Utc::now(),
        });
        assert!(recorder.played.lock().unwrap().is_empty());
        fx.apply(&Event::CycleCompleted {
            success_sound: true,
            at: Utc::now(),
        });
        assert_eq!(*recorder.played.lock().unwrap(), vec![Tone::Success]);
    }

    #[test]
    fn failures_are_absorbed() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        effects(&recorder).apply(&Event::PhaseEntered {
            phase: Phase::Focus,
            duration_secs: 1500,
            auto_started: false,
            notification: Some(notification_for(Phase::Focus)),
            tone: Some(Tone::Focus),
            at: Utc::now(),
        });
        assert_eq!(recorder.shown.lock().unwrap().len(), 1);
        assert_eq!(recorder.played.lock().unwrap().len(), 1);
    }
}
