use serde::Serialize;

use crate::model::schedule::WeeklySchedule;
use crate::model::task::TaskRecord;
use crate::model::timer::TimerMode;
use crate::model::weekday::Weekday;
use crate::ops::stats::{Completion, Statistics};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub position: usize,
    pub id: String,
    pub label: String,
    pub time: String,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct DayListJson {
    pub day: Weekday,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct CompletionJson {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

#[derive(Serialize)]
pub struct DayStatsJson {
    pub day: Weekday,
    #[serde(flatten)]
    pub completion: CompletionJson,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub days: Vec<DayStatsJson>,
    pub week: CompletionJson,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub day: Weekday,
    pub id: String,
}

#[derive(Serialize)]
pub struct ToggledJson {
    pub day: Weekday,
    pub id: String,
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(position: usize, task: &TaskRecord) -> TaskJson {
    TaskJson {
        position,
        id: task.id.clone(),
        label: task.label.clone(),
        time: task.time.clone(),
        completed: task.completed,
    }
}

pub fn day_to_json(day: Weekday, tasks: &[TaskRecord]) -> DayListJson {
    DayListJson {
        day,
        tasks: tasks
            .iter()
            .enumerate()
            .map(|(i, t)| task_to_json(i + 1, t))
            .collect(),
    }
}

pub fn completion_to_json(completion: Completion) -> CompletionJson {
    CompletionJson {
        completed: completion.completed,
        total: completion.total,
        percentage: completion.percentage(),
    }
}

pub fn stats_to_json(stats: &Statistics) -> StatsJson {
    StatsJson {
        days: Weekday::ALL
            .into_iter()
            .map(|day| DayStatsJson {
                day,
                completion: completion_to_json(stats.day(day)),
            })
            .collect(),
        week: completion_to_json(stats.week()),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `  3. [x] 06:00 AM  Wake up on time  (init-Monday-0-...)`
pub fn format_task_line(position: usize, task: &TaskRecord) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    format!(
        "{:>3}. [{}] {:<8}  {}  ({})",
        position, check, task.time, task.label, task.id
    )
}

/// Header line for a day: `== Monday  3/8 (38%) ==`
pub fn format_day_header(day: Weekday, completion: Completion) -> String {
    format!(
        "== {}  {}/{} ({}%) ==",
        day,
        completion.completed,
        completion.total,
        completion.percentage()
    )
}

pub fn format_day_listing(day: Weekday, schedule: &WeeklySchedule, stats: &Statistics) -> Vec<String> {
    let mut lines = vec![format_day_header(day, stats.day(day))];
    let tasks = schedule.tasks(day);
    if tasks.is_empty() {
        lines.push("  No habits for this day.".to_string());
    }
    for (i, task) in tasks.iter().enumerate() {
        lines.push(format_task_line(i + 1, task));
    }
    lines
}

/// Per-day table followed by the weekly total
pub fn format_stats(stats: &Statistics) -> Vec<String> {
    let mut lines = Vec::new();
    for day in Weekday::ALL {
        let c = stats.day(day);
        lines.push(format!(
            "  {:<10} {:>2}/{:<2} {:>4}%  {}",
            day.name(),
            c.completed,
            c.total,
            c.percentage(),
            progress_bar(c.percentage(), 20)
        ));
    }
    let week = stats.week();
    lines.push(String::new());
    lines.push(format!(
        "  Discipline score: {}% ({}/{})",
        week.percentage(),
        week.completed,
        week.total
    ));
    lines
}

/// Text bar of `width` cells filled to `percentage`
pub fn progress_bar(percentage: u8, width: usize) -> String {
    let filled = (usize::from(percentage.min(100)) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Parse a weekday argument
pub fn parse_day_arg(s: &str) -> Result<Weekday, String> {
    Weekday::parse_day(s).ok_or_else(|| {
        format!(
            "unknown day '{}' (expected a weekday name like monday or mon, or today)",
            s
        )
    })
}

/// Parse a timer mode argument
pub fn parse_mode_arg(s: &str) -> Result<TimerMode, String> {
    TimerMode::parse_mode(s)
        .ok_or_else(|| format!("unknown timer mode '{}' (expected: focus, short, long)", s))
}
