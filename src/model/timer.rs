use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Countdown preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Focus,
    #[serde(rename = "short")]
    ShortBreak,
    #[serde(rename = "long")]
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak];

    /// Full length of this mode in seconds
    pub fn duration_secs(self) -> u32 {
        match self {
            TimerMode::Focus => 25 * 60,
            TimerMode::ShortBreak => 5 * 60,
            TimerMode::LongBreak => 15 * 60,
        }
    }

    /// Short label for mode chips
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short",
            TimerMode::LongBreak => "Long",
        }
    }

    /// Parse `focus`, `short`, `long` (also `work`, `short-break`, `long-break`)
    pub fn parse_mode(s: &str) -> Option<TimerMode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" | "work" => Some(TimerMode::Focus),
            "short" | "short-break" | "shortbreak" => Some(TimerMode::ShortBreak),
            "long" | "long-break" | "longbreak" => Some(TimerMode::LongBreak),
            _ => None,
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the countdown is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Not running, time left (fresh or paused)
    Idle,
    Running,
    /// Ran down to zero; holds at `0:00` until reset
    Expired,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running; nothing changed
    Idle,
    /// One second elapsed
    Ticked,
    /// This tick reached zero; ring the alarm
    Expired,
}

/// Focus/break countdown state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    mode: TimerMode,
    remaining_secs: u32,
    running: bool,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        CountdownTimer::new(TimerMode::Focus)
    }
}

impl CountdownTimer {
    /// A stopped timer at the full duration of `mode`
    pub fn new(mode: TimerMode) -> Self {
        CountdownTimer {
            mode,
            remaining_secs: mode.duration_secs(),
            running: false,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.remaining_secs == 0 {
            TimerPhase::Expired
        } else {
            TimerPhase::Idle
        }
    }

    /// Start counting down. Does nothing once expired.
    /// Returns whether the timer is now running.
    pub fn start(&mut self) -> bool {
        if self.remaining_secs > 0 {
            self.running = true;
        }
        self.running
    }

    /// Stop counting, keeping the remaining time
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Start when stopped, pause when running
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.pause();
            false
        } else {
            self.start()
        }
    }

    /// Stop and rewind to the full duration of `mode`, or of the current mode
    pub fn reset(&mut self, mode: Option<TimerMode>) {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        self.remaining_secs = self.mode.duration_secs();
        self.running = false;
    }

    /// Advance one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked
        }
    }

    /// Elapsed share of the current mode, 0.0 to 1.0
    pub fn progress(&self) -> f64 {
        let total = self.mode.duration_secs();
        f64::from(total - self.remaining_secs.min(total)) / f64::from(total)
    }

    /// Remaining time as `m:ss`
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// Format seconds as `m:ss`
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// One-second interval that drives [`CountdownTimer::tick`] from an event loop.
///
/// Armed when the timer starts, disarmed when it leaves Running. Deadlines
/// advance by whole periods so a late poll catches up without drifting.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_deadline: Option<Instant>,
}

impl Default for Ticker {
    fn default() -> Self {
        Ticker::new(Duration::from_secs(1))
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker {
            period,
            next_deadline: None,
        }
    }

    /// Begin ticking; the first tick is one period after `now`
    pub fn arm(&mut self, now: Instant) {
        self.next_deadline = Some(now + self.period);
    }

    /// Stop ticking
    pub fn disarm(&mut self) {
        self.next_deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_deadline.is_some()
    }

    /// Number of whole ticks due at `now`, advancing the deadline past them
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut deadline) = self.next_deadline else {
            return 0;
        };
        let mut due = 0;
        while deadline <= now {
            due += 1;
            deadline += self.period;
        }
        self.next_deadline = Some(deadline);
        due
    }

    /// Time until the next tick, if armed
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_idle_focus() {
        let timer = CountdownTimer::default();
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert_eq!(timer.remaining_secs(), 1500);
        assert!(!timer.is_running());
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.display(), "25:00");
    }

    #[test]
    fn mode_durations() {
        assert_eq!(TimerMode::Focus.duration_secs(), 1500);
        assert_eq!(TimerMode::ShortBreak.duration_secs(), 300);
        assert_eq!(TimerMode::LongBreak.duration_secs(), 900);
    }

    #[test]
    fn tick_only_while_running() {
        let mut timer = CountdownTimer::default();
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining_secs(), 1500);

        assert!(timer.start());
        assert_eq!(timer.tick(), TickOutcome::Ticked);
        assert_eq!(timer.remaining_secs(), 1499);

        timer.pause();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining_secs(), 1499);
    }

    #[test]
    fn full_focus_run_expires_once() {
        let mut timer = CountdownTimer::default();
        timer.start();
        let mut alarms = 0;
        for _ in 0..1500 {
            if timer.tick() == TickOutcome::Expired {
                alarms += 1;
            }
        }
        assert_eq!(timer.remaining_secs(), 0);
        assert_eq!(timer.phase(), TimerPhase::Expired);
        assert_eq!(alarms, 1);
        assert_eq!(timer.display(), "0:00");

        // Further ticks and start attempts do nothing until reset
        for _ in 0..10 {
            assert_eq!(timer.tick(), TickOutcome::Idle);
        }
        assert!(!timer.start());
        assert_eq!(timer.remaining_secs(), 0);

        timer.reset(None);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_secs(), 1500);
    }

    #[test]
    fn reset_with_mode_switches_and_stops() {
        let mut timer = CountdownTimer::default();
        timer.start();
        timer.tick();
        timer.reset(Some(TimerMode::ShortBreak));
        assert_eq!(timer.mode(), TimerMode::ShortBreak);
        assert_eq!(timer.remaining_secs(), 300);
        assert!(!timer.is_running());
        assert_eq!(timer.display(), "5:00");
    }

    #[test]
    fn toggle_starts_and_pauses() {
        let mut timer = CountdownTimer::new(TimerMode::LongBreak);
        assert!(timer.toggle());
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert!(!timer.toggle());
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn progress_fraction() {
        let mut timer = CountdownTimer::new(TimerMode::ShortBreak);
        assert_eq!(timer.progress(), 0.0);
        timer.start();
        for _ in 0..150 {
            timer.tick();
        }
        assert!((timer.progress() - 0.5).abs() < 1e-9);
        for _ in 0..150 {
            timer.tick();
        }
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(245), "4:05");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn parse_modes() {
        assert_eq!(TimerMode::parse_mode("Focus"), Some(TimerMode::Focus));
        assert_eq!(TimerMode::parse_mode("short"), Some(TimerMode::ShortBreak));
        assert_eq!(TimerMode::parse_mode("long-break"), Some(TimerMode::LongBreak));
        assert_eq!(TimerMode::parse_mode("nap"), None);
    }

    #[test]
    fn ticker_counts_due_ticks() {
        let start = Instant::now();
        let mut ticker = Ticker::default();
        assert_eq!(ticker.due_ticks(start + Duration::from_secs(5)), 0);

        ticker.arm(start);
        assert!(ticker.is_armed());
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(999)), 0);
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(1000)), 1);
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(1500)), 0);
        // Late poll catches up on every missed second
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(4200)), 3);
        assert_eq!(
            ticker.time_until_next(start + Duration::from_millis(4200)),
            Some(Duration::from_millis(800))
        );
    }

    #[test]
    fn disarmed_ticker_is_silent() {
        let start = Instant::now();
        let mut ticker = Ticker::default();
        ticker.arm(start);
        ticker.disarm();
        assert!(!ticker.is_armed());
        assert_eq!(ticker.due_ticks(start + Duration::from_secs(10)), 0);
        assert_eq!(ticker.time_until_next(start), None);
    }
}
