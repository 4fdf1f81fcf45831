/// Application configuration constants
///
/// Centralized configuration for the reminder engine.

/// Key of the persistent slot holding the serialized reminder collection
pub const STORAGE_KEY: &str = "cropcare_reminders";

/// Fallback interval when a frequency string cannot be parsed (7 days)
pub const DEFAULT_INTERVAL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Snooze duration applied when the caller does not supply one
pub const DEFAULT_SNOOZE_MINUTES: u32 = 30;

/// Number of applications proposed by the AI schedule generator
pub const SCHEDULE_APPLICATIONS: usize = 5;

/// Early-morning spraying window, local hours [start, end)
pub const MORNING_WINDOW: (u32, u32) = (6, 8);

/// Evening spraying window, local hours [start, end)
pub const EVENING_WINDOW: (u32, u32) = (18, 20);

/// Capacity of the firing-event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Title shown on every treatment notification
pub const NOTIFICATION_TITLE: &str = "🌱 Treatment Reminder";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval_is_seven_days() {
        assert_eq!(DEFAULT_INTERVAL_MS, 604_800_000);
    }

    #[test]
    fn test_snooze_default_is_reasonable() {
        assert!(DEFAULT_SNOOZE_MINUTES > 0);
        assert!(DEFAULT_SNOOZE_MINUTES <= 24 * 60);
    }

    #[test]
    fn test_windows_are_valid_hours() {
        for (start, end) in [MORNING_WINDOW, EVENING_WINDOW] {
            assert!(start < end);
            assert!(end <= 24);
        }
    }
}
