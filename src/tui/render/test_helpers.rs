use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::alarm::SilentAlarm;
use crate::io::store::MemoryStore;
use crate::model::{AppConfig, Weekday};
use crate::ops::tracker::Tracker;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Draw `f` on a `w`x`h` test terminal and return the screen as text,
/// one line per row with trailing spaces and trailing empty rows dropped
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area)
        })
        .unwrap();

    let buffer = terminal.backend().buffer();
    let mut rows: Vec<String> = (0..buffer.area.height)
        .map(|y| {
            let row: String = (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect();
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    rows.join("\n")
}

/// App over the default template with Wednesday as today
pub fn test_app() -> App {
    let (tracker, _) = Tracker::open(Box::new(MemoryStore::new())).unwrap();
    App::new(
        tracker,
        &AppConfig::default(),
        Box::new(SilentAlarm),
        Weekday::Wednesday,
    )
}

/// Check or uncheck the first `n` habits of `day`
pub fn complete_first(app: &mut App, day: Weekday, n: usize) {
    let ids: Vec<String> = app
        .tracker
        .schedule()
        .tasks(day)
        .iter()
        .take(n)
        .map(|t| t.id.clone())
        .collect();
    for id in ids {
        app.tracker.toggle(day, &id).unwrap();
    }
}
