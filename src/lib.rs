//! Treatment reminder scheduling engine for the CropCare field app.
//!
//! Parses free-text treatment frequencies into intervals, persists reminders
//! as one JSON blob in a host-provided key-value slot, arms a one-shot timer
//! per active reminder, and on each firing notifies, chimes, broadcasts the
//! record, and re-arms. Host capabilities (storage, notification, audio) are
//! injected through small traits; construct [`ReminderService`] inside a
//! Tokio runtime and the rest is synchronous.

mod audio;
mod config;
mod dispatcher;
mod error;
mod frequency;
mod notify;
mod reminder;
mod scheduler;
mod service;
mod storage;

pub use audio::{AudioCue, ChimeCue, SilentCue};
pub use config::{DEFAULT_SNOOZE_MINUTES, STORAGE_KEY};
pub use dispatcher::NotificationDispatcher;
pub use error::{AppError, AppResult};
pub use frequency::parse_frequency;
pub use notify::{LogNotifier, Notifier};
pub use reminder::{DiseaseInfo, Reminder, ReminderOptions, ScheduleType, Treatment};
pub use service::{ReminderService, ScheduledApplication};
pub use storage::{KeyValueSlot, LocalSlot, MemorySlot, ReminderStore};
