use serde::{Deserialize, Serialize};

use super::weekday::Weekday;

/// Display string used when a task is added without a time
pub const NO_TIME: &str = "--:--";

/// A single recurring habit scheduled on one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Opaque identity, unique within the owning day
    pub id: String,
    /// What to do
    pub label: String,
    /// Free-text time of day, e.g. `06:00 AM`
    pub time: String,
    pub completed: bool,
}

impl TaskRecord {
    /// Create an uncompleted task with a fresh identity.
    /// A blank `time` becomes [`NO_TIME`].
    pub fn new(label: &str, time: &str) -> Self {
        TaskRecord {
            id: new_task_id(),
            label: label.trim().to_string(),
            time: normalize_time(time),
            completed: false,
        }
    }

    /// Create a template task for `day`, the `index`-th entry of the template
    pub fn from_template(day: Weekday, index: usize, label: &str, time: &str) -> Self {
        TaskRecord {
            id: format!("init-{}-{}-{}-{}", day.name(), index, now_millis(), random_suffix()),
            label: label.to_string(),
            time: time.to_string(),
            completed: false,
        }
    }
}

/// Identity for a newly added task: timestamp plus a random suffix
pub fn new_task_id() -> String {
    format!("task-{}-{}", now_millis(), random_suffix())
}

fn normalize_time(time: &str) -> String {
    let trimmed = time.trim();
    if trimmed.is_empty() {
        NO_TIME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn random_suffix() -> String {
    let mut simple = uuid::Uuid::new_v4().simple().to_string();
    simple.truncate(8);
    simple
}
