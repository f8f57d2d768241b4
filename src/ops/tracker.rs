use crate::io::schedule_io::{self, LoadOrigin};
use crate::io::store::{KeyValueStore, StoreError};
use crate::model::schedule::WeeklySchedule;
use crate::model::weekday::Weekday;
use crate::ops::schedule_ops;
use crate::ops::stats::{self, Statistics};

/// Owns the weekly schedule, its derived statistics and the store it
/// persists to.
///
/// Every mutation recomputes statistics and writes the whole schedule back.
/// A failed write leaves the in-memory schedule changed; the caller decides
/// how to surface the error.
pub struct Tracker {
    schedule: WeeklySchedule,
    stats: Statistics,
    store: Box<dyn KeyValueStore>,
}

impl Tracker {
    /// Load from `store`. A missing or unreadable schedule is replaced by
    /// the default template, which is written back at once so its ids stay
    /// valid across runs.
    pub fn open(store: Box<dyn KeyValueStore>) -> Result<(Tracker, LoadOrigin), StoreError> {
        Tracker::open_with(store, |_| {})
    }

    /// Like [`Tracker::open`], but `on_fallback` sees the origin before the
    /// template overwrites whatever was stored.
    pub fn open_with(
        store: Box<dyn KeyValueStore>,
        on_fallback: impl FnOnce(&LoadOrigin),
    ) -> Result<(Tracker, LoadOrigin), StoreError> {
        let loaded = schedule_io::load(store.as_ref());
        let mut tracker = Tracker::with_schedule(loaded.schedule, store);
        if loaded.origin != LoadOrigin::Stored {
            on_fallback(&loaded.origin);
            tracker.save()?;
        }
        Ok((tracker, loaded.origin))
    }

    pub fn with_schedule(schedule: WeeklySchedule, store: Box<dyn KeyValueStore>) -> Tracker {
        let stats = stats::compute(&schedule);
        Tracker {
            schedule,
            stats,
            store,
        }
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Flip a task's completion. Returns whether a task was found.
    pub fn toggle(&mut self, day: Weekday, id: &str) -> Result<bool, StoreError> {
        let found = schedule_ops::toggle(&mut self.schedule, day, id);
        self.commit()?;
        Ok(found)
    }

    /// Append a task. Returns its id, or `None` for a blank label.
    pub fn add(&mut self, day: Weekday, label: &str, time: &str) -> Result<Option<String>, StoreError> {
        let id = schedule_ops::add(&mut self.schedule, day, label, time);
        self.commit()?;
        Ok(id)
    }

    /// Remove a task. Returns whether a task was found.
    pub fn delete(&mut self, day: Weekday, id: &str) -> Result<bool, StoreError> {
        let found = schedule_ops::delete(&mut self.schedule, day, id);
        self.commit()?;
        Ok(found)
    }

    /// Clear every completion flag. Returns whether anything was completed.
    pub fn reset_all(&mut self) -> Result<bool, StoreError> {
        let changed = schedule_ops::reset_all(&mut self.schedule);
        self.commit()?;
        Ok(changed)
    }

    /// Write the current schedule to the store
    pub fn save(&mut self) -> Result<(), StoreError> {
        schedule_io::save(self.store.as_mut(), &self.schedule)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.stats = stats::compute(&self.schedule);
        self.save()
    }
}
