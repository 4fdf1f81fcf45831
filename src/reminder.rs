use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::frequency::parse_frequency;

/// Treatment description supplied by the diagnosis flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub instructions: Option<String>,
    pub warning: Option<String>,
}

/// Disease the treatment targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    #[default]
    Manual,
    Ai,
}

/// Per-reminder creation options.
#[derive(Debug, Clone, Default)]
pub struct ReminderOptions {
    /// Overrides the default first due time (now + interval). Used both for
    /// AI-schedule entries and fully custom user-entered times.
    pub custom_time: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub schedule_type: ScheduleType,
}

/// One recurring treatment-application schedule, the only persisted entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub treatment_name: String,
    pub disease_name: String,
    pub dosage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub schedule_type: ScheduleType,
    /// Next scheduled firing. Advanced by one interval on every firing, or
    /// replaced outright by a snooze.
    pub next_due: DateTime<Utc>,
    /// Recurrence interval, derived once at creation and never recomputed.
    #[serde(rename = "interval")]
    pub interval_ms: i64,
    pub is_active: bool,
    #[serde(default)]
    pub completed_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(treatment: &Treatment, disease: &DiseaseInfo, options: ReminderOptions) -> Self {
        let now = Utc::now();
        let interval_ms = parse_frequency(&treatment.frequency);

        Self {
            id: generate_id(),
            treatment_name: treatment.name.clone(),
            disease_name: disease.name.clone(),
            dosage: treatment.dosage.clone(),
            instructions: treatment.instructions.clone(),
            warning: treatment.warning.clone(),
            note: options.note,
            schedule_type: options.schedule_type,
            next_due: options
                .custom_time
                .unwrap_or(now + Duration::milliseconds(interval_ms)),
            interval_ms,
            is_active: true,
            completed_count: 0,
            last_completed: None,
            created_at: now,
        }
    }

    pub fn is_due(&self) -> bool {
        self.is_active && self.next_due <= Utc::now()
    }
}

/// Millisecond timestamp plus a random base-36 suffix, unique even for
/// reminders created within the same millisecond.
fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| char::from_digit(rng.gen_range(0u32..36), 36).expect("radix 36"))
        .collect();
    format!("{}{}", Utc::now().timestamp_millis(), suffix)
}
