use crate::model::schedule::WeeklySchedule;
use crate::model::weekday::Weekday;

/// Completion counts for a day or the whole week
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Completion {
    pub completed: usize,
    pub total: usize,
}

impl Completion {
    /// Rounded completion percentage, 0 when there is nothing to complete
    pub fn percentage(self) -> u8 {
        percentage(self.completed, self.total)
    }
}

/// Percentages derived from a schedule. Always rebuilt with [`compute`],
/// never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    days: [Completion; 7],
    week: Completion,
}

impl Statistics {
    pub fn day(&self, day: Weekday) -> Completion {
        self.days[day.index()]
    }

    pub fn week(&self) -> Completion {
        self.week
    }

    pub fn day_percentage(&self, day: Weekday) -> u8 {
        self.day(day).percentage()
    }

    pub fn weekly_percentage(&self) -> u8 {
        self.week.percentage()
    }

    /// Per-day percentages in week order
    pub fn per_day(&self) -> impl Iterator<Item = (Weekday, u8)> + '_ {
        Weekday::ALL
            .into_iter()
            .map(|day| (day, self.day_percentage(day)))
    }
}

/// Derive per-day and weekly completion from the full schedule
pub fn compute(schedule: &WeeklySchedule) -> Statistics {
    let mut days = [Completion::default(); 7];
    let mut week = Completion::default();
    for (day, tasks) in schedule.days() {
        let completed = tasks.iter().filter(|t| t.completed).count();
        days[day.index()] = Completion {
            completed,
            total: tasks.len(),
        };
        week.completed += completed;
        week.total += tasks.len();
    }
    Statistics { days, week }
}

/// `round(100 * completed / total)` with halves rounding up, in integer
/// arithmetic. Zero total yields 0.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}
