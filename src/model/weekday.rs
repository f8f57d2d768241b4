use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// One of the seven fixed days of the week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in display order
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Full name, as used for the persisted keys
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Three-letter abbreviation for tabs and tables
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    /// Position in the week (Monday = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day at the given position, wrapping around the week
    pub fn from_index(index: usize) -> Weekday {
        Weekday::ALL[index % 7]
    }

    pub fn next(self) -> Weekday {
        Weekday::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Weekday {
        Weekday::from_index(self.index() + 6)
    }

    /// Today's weekday on the local clock
    pub fn today() -> Weekday {
        chrono::Local::now().weekday().into()
    }

    /// Parse a day name: full or three-letter, case-insensitive, or `today`
    pub fn parse_day(s: &str) -> Option<Weekday> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "today" {
            return Some(Weekday::today());
        }
        Weekday::ALL.into_iter().find(|day| {
            let name = day.name().to_ascii_lowercase();
            lower == name || lower == name[..3]
        })
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::from_index(day.num_days_from_monday() as usize)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
