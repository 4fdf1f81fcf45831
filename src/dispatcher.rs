use std::sync::Arc;

use log::warn;
use tokio::sync::broadcast;

use crate::audio::AudioCue;
use crate::config::{EVENT_CHANNEL_CAPACITY, NOTIFICATION_TITLE};
use crate::notify::Notifier;
use crate::reminder::Reminder;

/// Runs the best-effort half of the firing procedure: system notification,
/// audio cue, and an in-process broadcast of the full reminder record so UI
/// layers can react without the dispatcher knowing about them.
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    audio: Arc<dyn AudioCue>,
    events: broadcast::Sender<Reminder>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, audio: Arc<dyn AudioCue>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            notifier,
            audio,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Reminder> {
        self.events.subscribe()
    }

    /// A failed notification or chime must not stop the remaining steps, and
    /// a broadcast with no live subscribers is not an error.
    pub fn dispatch(&self, reminder: &Reminder) {
        let body = format!(
            "Apply {} for {}",
            reminder.treatment_name, reminder.disease_name
        );
        if let Err(e) = self.notifier.show(NOTIFICATION_TITLE, &body) {
            warn!("notification failed for reminder {}: {}", reminder.id, e);
        }
        if let Err(e) = self.audio.play() {
            warn!("reminder chime failed: {}", e);
        }

        let _ = self.events.send(reminder.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentCue;
    use crate::error::{AppError, AppResult};
    use crate::reminder::{DiseaseInfo, ReminderOptions, Treatment};

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn show(&self, _title: &str, _body: &str) -> AppResult<()> {
            Err(AppError::notification("permission denied"))
        }
    }

    fn test_reminder() -> Reminder {
        Reminder::new(
            &Treatment {
                name: "Neem Oil".to_string(),
                dosage: "5ml".to_string(),
                frequency: "every 2 days".to_string(),
                instructions: None,
                warning: None,
            },
            &DiseaseInfo {
                name: "Leaf Blight".to_string(),
            },
            ReminderOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_dispatch_broadcasts_even_when_notifier_fails() {
        let dispatcher =
            NotificationDispatcher::new(Arc::new(FailingNotifier), Arc::new(SilentCue));
        let mut rx = dispatcher.subscribe();

        let reminder = test_reminder();
        dispatcher.dispatch(&reminder);

        let received = rx.try_recv().unwrap();
        assert_eq!(received.id, reminder.id);
        assert_eq!(received.treatment_name, "Neem Oil");
    }

    #[tokio::test]
    async fn test_dispatch_without_subscribers_is_fine() {
        let dispatcher =
            NotificationDispatcher::new(Arc::new(FailingNotifier), Arc::new(SilentCue));
        dispatcher.dispatch(&test_reminder());
    }
}
