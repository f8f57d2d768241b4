use crate::model::schedule::WeeklySchedule;
use crate::model::task::TaskRecord;
use crate::model::weekday::Weekday;

/// Question asked before [`reset_all`] runs
pub const RESET_PROMPT: &str =
    "Reset all checkboxes for the week? (Your habit list will remain unchanged)";

// All operations are total: an unknown task ID on `day` leaves the schedule
// untouched. The returned flag says whether anything changed.

/// Flip completion of one task
pub fn toggle(schedule: &mut WeeklySchedule, day: Weekday, task_id: &str) -> bool {
    match schedule.find_mut(day, task_id) {
        Some(task) => {
            task.completed = !task.completed;
            true
        }
        None => false,
    }
}

/// Append a new uncompleted task to the end of `day`.
///
/// Returns the new task's ID, or `None` (and adds nothing) when the label is
/// blank after trimming. A blank time is stored as `--:--`.
pub fn add(schedule: &mut WeeklySchedule, day: Weekday, label: &str, time: &str) -> Option<String> {
    if label.trim().is_empty() {
        return None;
    }
    let task = TaskRecord::new(label, time);
    let id = task.id.clone();
    schedule.tasks_mut(day).push(task);
    Some(id)
}

/// Remove one task, keeping the order of the rest
pub fn delete(schedule: &mut WeeklySchedule, day: Weekday, task_id: &str) -> bool {
    let tasks = schedule.tasks_mut(day);
    let before = tasks.len();
    tasks.retain(|t| t.id != task_id);
    tasks.len() != before
}

/// Clear every checkbox in the week. Labels, times, IDs and order are kept.
pub fn reset_all(schedule: &mut WeeklySchedule) -> bool {
    let mut changed = false;
    for day in Weekday::ALL {
        for task in schedule.tasks_mut(day).iter_mut() {
            if task.completed {
                task.completed = false;
                changed = true;
            }
        }
    }
    changed
}

/// Resolve a CLI-style task reference on `day`: an exact ID, or a 1-based position
pub fn resolve_task_ref<'a>(
    schedule: &'a WeeklySchedule,
    day: Weekday,
    reference: &str,
) -> Option<&'a TaskRecord> {
    let tasks = schedule.tasks(day);
    if let Some(task) = tasks.iter().find(|t| t.id == reference) {
        return Some(task);
    }
    reference
        .parse::<usize>()
        .ok()
        .filter(|&n| n >= 1)
        .and_then(|n| tasks.get(n - 1))
}
