use serde::{Deserialize, Serialize};

use super::task::TaskRecord;
use super::weekday::Weekday;

/// The habits every day starts with on a fresh install: (label, time)
pub const DEFAULT_HABITS: [(&str, &str); 8] = [
    ("Wake up on time", "06:00 AM"),
    ("Workout / Run", "07:00 AM"),
    ("Meditation", "08:30 AM"),
    ("Tech learning", "10:00 AM"),
    ("GF time", "06:00 PM"),
    ("Channel task", "08:00 PM"),
    ("Online class", "09:00 PM"),
    ("Sleep on time", "11:00 PM"),
];

/// Every weekday mapped to its ordered task list.
///
/// One field per day, so a day can never be missing; days absent from
/// stored data deserialize as empty lists. Field order is the persisted
/// key order (Monday through Sunday).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(rename = "Monday", default)]
    monday: Vec<TaskRecord>,
    #[serde(rename = "Tuesday", default)]
    tuesday: Vec<TaskRecord>,
    #[serde(rename = "Wednesday", default)]
    wednesday: Vec<TaskRecord>,
    #[serde(rename = "Thursday", default)]
    thursday: Vec<TaskRecord>,
    #[serde(rename = "Friday", default)]
    friday: Vec<TaskRecord>,
    #[serde(rename = "Saturday", default)]
    saturday: Vec<TaskRecord>,
    #[serde(rename = "Sunday", default)]
    sunday: Vec<TaskRecord>,
}

impl WeeklySchedule {
    /// A schedule with no tasks on any day
    pub fn empty() -> Self {
        WeeklySchedule::default()
    }

    /// The default template replicated into every day, each task with its own identity
    pub fn from_template() -> Self {
        let mut schedule = WeeklySchedule::empty();
        for day in Weekday::ALL {
            let tasks = schedule.tasks_mut(day);
            for (i, (label, time)) in DEFAULT_HABITS.iter().enumerate() {
                tasks.push(TaskRecord::from_template(day, i, label, time));
            }
        }
        schedule
    }

    /// Tasks for a day, in insertion order
    pub fn tasks(&self, day: Weekday) -> &[TaskRecord] {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    pub fn tasks_mut(&mut self, day: Weekday) -> &mut Vec<TaskRecord> {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }

    /// Find a task by identity within one day
    pub fn find(&self, day: Weekday, task_id: &str) -> Option<&TaskRecord> {
        self.tasks(day).iter().find(|t| t.id == task_id)
    }

    pub fn find_mut(&mut self, day: Weekday, task_id: &str) -> Option<&mut TaskRecord> {
        self.tasks_mut(day).iter_mut().find(|t| t.id == task_id)
    }

    /// Iterate days in order with their tasks
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[TaskRecord])> {
        Weekday::ALL.into_iter().map(move |day| (day, self.tasks(day)))
    }

    /// Total number of tasks across the week
    pub fn task_count(&self) -> usize {
        self.days().map(|(_, tasks)| tasks.len()).sum()
    }
}
