use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Local, Utc};
use log::warn;
use rand::Rng;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::audio::{AudioCue, ChimeCue};
use crate::config::{
    DEFAULT_SNOOZE_MINUTES, EVENING_WINDOW, MORNING_WINDOW, SCHEDULE_APPLICATIONS,
};
use crate::dispatcher::NotificationDispatcher;
use crate::error::AppResult;
use crate::frequency::parse_frequency;
use crate::notify::{LogNotifier, Notifier};
use crate::reminder::{DiseaseInfo, Reminder, ReminderOptions, Treatment};
use crate::scheduler::TimerRegistry;
use crate::storage::{KeyValueSlot, LocalSlot, ReminderStore};

/// One proposed application slot from the AI schedule generator. Proposals
/// are not reminders; callers materialize the ones the user confirms via
/// [`ReminderService::create_reminder`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledApplication {
    pub application: u32,
    pub due_time: DateTime<Utc>,
    pub description: String,
}

/// Facade over parsing, persistence, timers and notification dispatch.
///
/// Cheap to clone; every clone shares the same state. All operations are
/// synchronous (the armed timer is the only asynchronous boundary), but the
/// service must be constructed inside a Tokio runtime so timers have
/// somewhere to run.
#[derive(Clone)]
pub struct ReminderService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    reminders: Mutex<Vec<Reminder>>,
    store: ReminderStore,
    timers: TimerRegistry,
    dispatcher: NotificationDispatcher,
}

impl ReminderService {
    /// Platform defaults: file-backed slot in the local data dir, logging
    /// notifier, rodio chime.
    pub fn new() -> AppResult<Self> {
        Self::with_capabilities(LocalSlot::new()?, Arc::new(LogNotifier), Arc::new(ChimeCue::new()))
    }

    /// Construct with injected host capabilities.
    ///
    /// Construction requests notification permission, loads the stored
    /// collection, and re-arms every active reminder. A reminder whose due
    /// time already passed (e.g. the app was closed past it) fires right
    /// away, once, and then recurs from now.
    pub fn with_capabilities(
        slot: Arc<dyn KeyValueSlot>,
        notifier: Arc<dyn Notifier>,
        audio: Arc<dyn AudioCue>,
    ) -> AppResult<Self> {
        notifier.request_permission();

        let store = ReminderStore::new(slot);
        let reminders = store.load();
        let service = Self {
            inner: Arc::new(ServiceInner {
                reminders: Mutex::new(reminders),
                store,
                timers: TimerRegistry::new(),
                dispatcher: NotificationDispatcher::new(notifier, audio),
            }),
        };

        let active: Vec<Reminder> = service
            .lock_reminders()
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect();
        for reminder in &active {
            service.schedule(reminder);
        }

        Ok(service)
    }

    /// Lock the collection, recovering from poison if needed
    fn lock_reminders(&self) -> MutexGuard<'_, Vec<Reminder>> {
        self.inner
            .reminders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Receiver of firing events, each carrying the full reminder record.
    pub fn subscribe(&self) -> broadcast::Receiver<Reminder> {
        self.inner.dispatcher.subscribe()
    }

    pub fn create_reminder(
        &self,
        treatment: &Treatment,
        disease: &DiseaseInfo,
        options: ReminderOptions,
    ) -> AppResult<Reminder> {
        let reminder = Reminder::new(treatment, disease, options);
        {
            let mut reminders = self.lock_reminders();
            reminders.push(reminder.clone());
            self.inner.store.save(&reminders)?;
        }
        self.schedule(&reminder);
        Ok(reminder)
    }

    /// Acknowledge one applied dose. Only the completion counters move; the
    /// due time and the pending timer are untouched. Unknown ids are a no-op.
    pub fn complete_reminder(&self, id: &str) -> AppResult<()> {
        let mut reminders = self.lock_reminders();
        if let Some(reminder) = reminders.iter_mut().find(|r| r.id == id) {
            reminder.completed_count += 1;
            reminder.last_completed = Some(Utc::now());
            self.inner.store.save(&reminders)?;
        }
        Ok(())
    }

    /// Push the next firing out to now + `minutes` (default 30) without
    /// changing the recurrence interval.
    pub fn snooze_reminder(&self, id: &str, minutes: Option<u32>) -> AppResult<()> {
        let minutes = minutes.unwrap_or(DEFAULT_SNOOZE_MINUTES);
        let snapshot = {
            let mut reminders = self.lock_reminders();
            let Some(reminder) = reminders.iter_mut().find(|r| r.id == id) else {
                return Ok(());
            };
            reminder.next_due = Utc::now() + Duration::minutes(minutes as i64);
            let snapshot = reminder.clone();
            self.inner.store.save(&reminders)?;
            snapshot
        };

        // Replace the pending timer with one for the snoozed due time
        self.inner.timers.cancel(id);
        self.schedule(&snapshot);
        Ok(())
    }

    pub fn delete_reminder(&self, id: &str) -> AppResult<()> {
        {
            let mut reminders = self.lock_reminders();
            reminders.retain(|r| r.id != id);
            self.inner.store.save(&reminders)?;
        }
        self.inner.timers.cancel(id);
        Ok(())
    }

    /// Active reminders in insertion order.
    pub fn get_active_reminders(&self) -> Vec<Reminder> {
        self.lock_reminders()
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect()
    }

    /// Propose the next [`SCHEDULE_APPLICATIONS`] application slots for a
    /// treatment, spaced one parsed interval apart and biased into the
    /// early-morning or evening spraying window. Pure planning: nothing is
    /// created or persisted.
    pub fn generate_ai_schedule(
        &self,
        treatment: &Treatment,
        _disease: &DiseaseInfo,
    ) -> Vec<ScheduledApplication> {
        let interval_ms = parse_frequency(&treatment.frequency);
        let now = Utc::now();
        let mut rng = rand::thread_rng();

        (0..SCHEDULE_APPLICATIONS)
            .map(|i| {
                let base = now + Duration::milliseconds(interval_ms * i as i64);
                ScheduledApplication {
                    application: i as u32 + 1,
                    due_time: optimal_time(base, &mut rng),
                    description: format!("Application {} of {}", i + 1, treatment.name),
                }
            })
            .collect()
    }

    /// Arm the one-shot timer for a reminder, or fire immediately when the
    /// due time has already passed.
    fn schedule(&self, reminder: &Reminder) {
        if !reminder.is_active {
            return;
        }

        let delay_ms = (reminder.next_due - Utc::now()).num_milliseconds();
        if delay_ms <= 0 {
            self.trigger(&reminder.id);
            return;
        }

        let service = self.clone();
        let id = reminder.id.clone();
        self.inner.timers.arm(
            &reminder.id,
            StdDuration::from_millis(delay_ms as u64),
            move || service.trigger(&id),
        );
    }

    /// The firing procedure: advance the due time and persist, then run the
    /// best-effort dispatch steps, then arm the next occurrence.
    fn trigger(&self, id: &str) {
        let fired = {
            let mut reminders = self.lock_reminders();
            let Some(reminder) = reminders.iter_mut().find(|r| r.id == id) else {
                // deleted while the timer was in flight
                return;
            };
            if !reminder.is_active {
                return;
            }
            reminder.next_due = Utc::now() + Duration::milliseconds(reminder.interval_ms);
            let snapshot = reminder.clone();
            if let Err(e) = self.inner.store.save(&reminders) {
                // nothing awaits a timer callback, so a failed save only warns
                warn!("failed to persist fired reminder {}: {}", id, e);
            }
            snapshot
        };

        self.inner.dispatcher.dispatch(&fired);
        self.schedule(&fired);
    }
}

/// Bias a due time into the early-morning or evening spraying window of its
/// local day, with a randomized minute.
fn optimal_time<R: Rng>(base: DateTime<Utc>, rng: &mut R) -> DateTime<Utc> {
    let (start, end) = if rng.gen_bool(0.5) {
        MORNING_WINDOW
    } else {
        EVENING_WINDOW
    };
    let hour = rng.gen_range(start..end);
    let minute = rng.gen_range(0u32..60);

    base.with_timezone(&Local)
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(base)
}
