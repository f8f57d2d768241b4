use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::alarm::{self, Alarm};
use crate::io::config_io;
use crate::io::schedule_io::{self, LoadOrigin};
use crate::io::store::{FileStore, StoreError};
use crate::model::{AppConfig, CountdownTimer, TaskRecord, TickOutcome, Ticker, TimerMode, Weekday};
use crate::ops::tracker::Tracker;

use super::input;
use super::render;
use super::theme::Theme;

/// Longest the event loop waits for input when no tick is due sooner
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the add-habit form
    Edit,
    /// Waiting for y/n in the status row
    Confirm,
}

/// Which field of the add form has the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Label,
    Time,
}

/// In-progress "add habit" form for the selected day
#[derive(Debug, Clone)]
pub struct AddForm {
    pub label: String,
    pub time: String,
    pub field: AddField,
    /// Byte offset into the focused field
    pub cursor: usize,
}

impl AddForm {
    pub fn new() -> Self {
        AddForm {
            label: String::new(),
            time: String::new(),
            field: AddField::Label,
            cursor: 0,
        }
    }

    pub fn buffer(&self) -> &str {
        match self.field {
            AddField::Label => &self.label,
            AddField::Time => &self.time,
        }
    }

    pub fn buffer_mut(&mut self) -> &mut String {
        match self.field {
            AddField::Label => &mut self.label,
            AddField::Time => &mut self.time,
        }
    }

    /// Move focus to the other field, cursor at its end
    pub fn switch_field(&mut self) {
        self.field = match self.field {
            AddField::Label => AddField::Time,
            AddField::Time => AddField::Label,
        };
        self.cursor = self.buffer().len();
    }
}

impl Default for AddForm {
    fn default() -> Self {
        AddForm::new()
    }
}

/// Action awaiting confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ResetWeek,
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// Main application state
pub struct App {
    pub tracker: Tracker,
    /// Where failed writes are logged; `None` keeps diagnostics off (tests)
    pub data_dir: Option<PathBuf>,
    pub timer: CountdownTimer,
    pub ticker: Ticker,
    pub alarm: Box<dyn Alarm>,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub mode: Mode,
    /// Day shown in the task list
    pub day: Weekday,
    pub today: Weekday,
    /// Cursor per day, so switching tabs keeps each day's position
    pub cursors: [usize; 7],
    pub add_form: Option<AddForm>,
    pub confirm_state: Option<ConfirmState>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(tracker: Tracker, config: &AppConfig, alarm: Box<dyn Alarm>, today: Weekday) -> Self {
        App {
            tracker,
            data_dir: None,
            timer: CountdownTimer::default(),
            ticker: Ticker::default(),
            alarm,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            mode: Mode::Navigate,
            day: today,
            today,
            cursors: [0; 7],
            add_form: None,
            confirm_state: None,
            status_message: None,
            status_is_error: false,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        self.tracker.schedule().tasks(self.day)
    }

    pub fn cursor(&self) -> usize {
        self.cursors[self.day.index()]
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursors[self.day.index()] = cursor;
        self.clamp_cursor();
    }

    /// Keep the cursor of the current day inside its task list
    pub fn clamp_cursor(&mut self) {
        let len = self.tasks().len();
        let cursor = &mut self.cursors[self.day.index()];
        *cursor = if len == 0 { 0 } else { (*cursor).min(len - 1) };
    }

    pub fn selected_task(&self) -> Option<&TaskRecord> {
        self.tasks().get(self.cursor())
    }

    pub fn select_day(&mut self, day: Weekday) {
        self.day = day;
        self.clamp_cursor();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    /// A neutral notice when the stored habits could not be used
    pub fn note_load_origin(&mut self, origin: &LoadOrigin) {
        if let LoadOrigin::Unreadable { .. } = origin {
            self.set_status("started from the default habits; earlier data is in zw recovery");
        }
    }

    /// Surface a failed write. The in-memory change stays.
    pub fn report_store_result<T>(&mut self, result: Result<T, StoreError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                if let Some(dir) = &self.data_dir {
                    schedule_io::log_save_failure(dir, &e, self.tracker.schedule());
                }
                self.set_error(format!("save failed: {}", e));
                None
            }
        }
    }

    // -- Timer ---------------------------------------------------------------

    /// "Start Focus" / "Pause"
    pub fn start_pause_timer(&mut self, now: Instant) {
        if self.timer.toggle() {
            self.ticker.arm(now);
        } else {
            self.ticker.disarm();
        }
    }

    /// Mode chips reset to the new mode's full duration
    pub fn switch_timer_mode(&mut self, mode: TimerMode) {
        self.timer.reset(Some(mode));
        self.ticker.disarm();
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset(None);
        self.ticker.disarm();
    }

    /// Apply every tick due at `now`; ring once on expiry
    pub fn advance_timer(&mut self, now: Instant) {
        for _ in 0..self.ticker.due_ticks(now) {
            match self.timer.tick() {
                TickOutcome::Expired => {
                    self.ticker.disarm();
                    self.alarm.ring();
                    self.set_status(format!("{} finished", self.timer.mode()));
                    break;
                }
                TickOutcome::Idle => {
                    self.ticker.disarm();
                    break;
                }
                TickOutcome::Ticked => {}
            }
        }
    }

    /// How long the event loop may block waiting for input
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.ticker
            .time_until_next(now)
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL))
    }
}

/// Run the TUI application
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::read_config(data_dir)?;
    let (tracker, origin) = Tracker::open_with(Box::new(FileStore::new(data_dir)), |origin| {
        schedule_io::log_load_fallback(data_dir, origin)
    })?;

    let mut app = App::new(
        tracker,
        &config,
        alarm::alarm_for(config.alarm.kind),
        Weekday::today(),
    );
    app.data_dir = Some(data_dir.to_path_buf());
    app.note_load_origin(&origin);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        app.advance_timer(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::{KeyValueStore, MemoryStore};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingAlarm(Rc<Cell<u32>>);

    impl Alarm for CountingAlarm {
        fn ring(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            let template = crate::model::schedule::WeeklySchedule::from_template();
            Ok(Some(crate::io::schedule_io::serialize_schedule(&template)?))
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }
    }

    fn app_with_alarm(rings: Rc<Cell<u32>>) -> App {
        let (tracker, _) = Tracker::open(Box::new(MemoryStore::new())).unwrap();
        App::new(
            tracker,
            &AppConfig::default(),
            Box::new(CountingAlarm(rings)),
            Weekday::Wednesday,
        )
    }

    #[test]
    fn opens_on_today_with_cursor_at_top() {
        let app = app_with_alarm(Rc::default());
        assert_eq!(app.day, Weekday::Wednesday);
        assert_eq!(app.cursor(), 0);
        assert_eq!(app.selected_task().unwrap().label, "Wake up on time");
    }

    #[test]
    fn cursor_is_clamped_per_day() {
        let mut app = app_with_alarm(Rc::default());
        app.set_cursor(100);
        assert_eq!(app.cursor(), 7);
        app.select_day(Weekday::Thursday);
        assert_eq!(app.cursor(), 0);
        app.select_day(Weekday::Wednesday);
        assert_eq!(app.cursor(), 7);
    }

    #[test]
    fn focus_runs_down_and_rings_once() {
        let rings = Rc::new(Cell::new(0));
        let mut app = app_with_alarm(rings.clone());
        let start = Instant::now();
        app.start_pause_timer(start);
        assert!(app.timer.is_running());

        // Poll late by a minute: catch up 60 ticks
        app.advance_timer(start + Duration::from_secs(60));
        assert_eq!(app.timer.display(), "24:00");

        app.advance_timer(start + Duration::from_secs(1500));
        assert_eq!(app.timer.remaining_secs(), 0);
        assert!(!app.timer.is_running());
        assert!(!app.ticker.is_armed());
        assert_eq!(rings.get(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Focus finished"));

        app.advance_timer(start + Duration::from_secs(3000));
        assert_eq!(rings.get(), 1);
        assert_eq!(app.timer.display(), "0:00");

        // Expired timer does not restart until reset
        app.start_pause_timer(start + Duration::from_secs(3001));
        assert!(!app.timer.is_running());
        app.reset_timer();
        assert_eq!(app.timer.display(), "25:00");
    }

    #[test]
    fn pause_stops_ticking() {
        let mut app = app_with_alarm(Rc::default());
        let start = Instant::now();
        app.start_pause_timer(start);
        app.advance_timer(start + Duration::from_secs(5));
        app.start_pause_timer(start + Duration::from_secs(5));
        app.advance_timer(start + Duration::from_secs(500));
        assert_eq!(app.timer.remaining_secs(), 1495);
        assert_eq!(app.poll_timeout(start), IDLE_POLL);
    }

    #[test]
    fn mode_switch_resets_and_stops() {
        let mut app = app_with_alarm(Rc::default());
        let start = Instant::now();
        app.start_pause_timer(start);
        app.switch_timer_mode(TimerMode::ShortBreak);
        assert!(!app.timer.is_running());
        assert!(!app.ticker.is_armed());
        assert_eq!(app.timer.display(), "5:00");
    }

    #[test]
    fn poll_timeout_tracks_next_tick() {
        let mut app = app_with_alarm(Rc::default());
        let start = Instant::now();
        app.start_pause_timer(start);
        assert_eq!(
            app.poll_timeout(start + Duration::from_millis(900)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn unreadable_store_is_a_notice_not_an_error() {
        let mut app = app_with_alarm(Rc::default());
        app.note_load_origin(&LoadOrigin::Missing);
        assert!(app.status_message.is_none());

        app.note_load_origin(&LoadOrigin::Unreadable {
            reason: "expected value".into(),
            raw: Some("{ not json".into()),
        });
        assert!(!app.status_is_error);
        assert!(app.status_message.as_deref().unwrap().contains("zw recovery"));
    }

    #[test]
    fn failed_save_shows_error_and_keeps_change() {
        let (tracker, _) = Tracker::open(Box::new(ReadOnlyStore)).unwrap();
        let mut app = App::new(tracker, &AppConfig::default(), Box::new(alarm::SilentAlarm), Weekday::Monday);
        let id = app.tasks()[0].id.clone();
        let result = app.tracker.toggle(Weekday::Monday, &id);
        assert!(app.report_store_result(result).is_none());
        assert!(app.status_is_error);
        assert!(app.status_message.as_deref().unwrap().starts_with("save failed"));
        assert!(app.tasks()[0].completed);
    }
}
