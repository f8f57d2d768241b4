use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::TimerMode;
use crate::ops::schedule_ops::RESET_PROMPT;
use crate::tui::app::{AddForm, App, ConfirmAction, ConfirmState, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay swallows everything but its close keys
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.should_quit = true;
        }
        return;
    }

    app.clear_status();

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Days
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
            let day = app.day.prev();
            app.select_day(day);
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            let day = app.day.next();
            app.select_day(day);
        }
        KeyCode::Char('.') => {
            let today = app.today;
            app.select_day(today);
        }

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char('g') | KeyCode::Home => app.set_cursor(0),
        KeyCode::Char('G') | KeyCode::End => app.set_cursor(usize::MAX),

        // Habits
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => toggle_selected(app),
        KeyCode::Char('a') => {
            app.add_form = Some(AddForm::new());
            app.mode = Mode::Edit;
        }
        KeyCode::Char('d') => delete_selected(app),
        KeyCode::Char('R') => {
            app.confirm_state = Some(ConfirmState {
                message: RESET_PROMPT.to_string(),
                action: ConfirmAction::ResetWeek,
            });
            app.mode = Mode::Confirm;
        }

        // Timer
        KeyCode::Char('t') => app.start_pause_timer(Instant::now()),
        KeyCode::Char('1') => app.switch_timer_mode(TimerMode::Focus),
        KeyCode::Char('2') => app.switch_timer_mode(TimerMode::ShortBreak),
        KeyCode::Char('3') => app.switch_timer_mode(TimerMode::LongBreak),
        KeyCode::Char('r') => app.reset_timer(),

        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    let cursor = app.cursor().saturating_add_signed(delta);
    app.set_cursor(cursor);
}

fn toggle_selected(app: &mut App) {
    let Some(id) = app.selected_task().map(|t| t.id.clone()) else {
        return;
    };
    let day = app.day;
    let result = app.tracker.toggle(day, &id);
    app.report_store_result(result);
}

fn delete_selected(app: &mut App) {
    let Some(task) = app.selected_task().cloned() else {
        return;
    };
    let day = app.day;
    let result = app.tracker.delete(day, &task.id);
    app.clamp_cursor();
    if app.report_store_result(result).is_some() {
        app.set_status(format!("deleted \"{}\"", task.label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::alarm::SilentAlarm;
    use crate::io::store::MemoryStore;
    use crate::model::{AppConfig, Weekday};
    use crate::ops::tracker::Tracker;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;

    fn app() -> App {
        let (tracker, _) = Tracker::open(Box::new(MemoryStore::new())).unwrap();
        App::new(tracker, &AppConfig::default(), Box::new(SilentAlarm), Weekday::Sunday)
    }

    #[test]
    fn day_switching_wraps_and_jumps_to_today() {
        let mut app = app();
        handle_key(&mut app, ch('l'));
        assert_eq!(app.day, Weekday::Monday);
        handle_key(&mut app, key(KeyCode::Left));
        handle_key(&mut app, key(KeyCode::Left));
        assert_eq!(app.day, Weekday::Saturday);
        handle_key(&mut app, key(KeyCode::Tab));
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.day, Weekday::Monday);
        handle_key(&mut app, ch('.'));
        assert_eq!(app.day, Weekday::Sunday);
    }

    #[test]
    fn cursor_moves_within_bounds() {
        let mut app = app();
        handle_key(&mut app, ch('k'));
        assert_eq!(app.cursor(), 0);
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.cursor(), 2);
        handle_key(&mut app, ch('G'));
        assert_eq!(app.cursor(), 7);
        handle_key(&mut app, ch('j'));
        assert_eq!(app.cursor(), 7);
        handle_key(&mut app, ch('g'));
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn space_toggles_selected_habit() {
        let mut app = app();
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch(' '));
        assert!(app.tasks()[1].completed);
        assert_eq!(app.tracker.stats().day_percentage(Weekday::Sunday), 13);
        handle_key(&mut app, ch('x'));
        assert!(!app.tasks()[1].completed);
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.tasks()[1].completed);
        // Other days untouched
        assert_eq!(app.tracker.stats().day(Weekday::Saturday).completed, 0);
    }

    #[test]
    fn delete_removes_and_clamps() {
        let mut app = app();
        handle_key(&mut app, ch('G'));
        handle_key(&mut app, ch('d'));
        assert_eq!(app.tasks().len(), 7);
        assert_eq!(app.cursor(), 6);
        assert_eq!(app.status_message.as_deref(), Some("deleted \"Sleep on time\""));
    }

    #[test]
    fn delete_on_empty_day_is_noop() {
        let (tracker, _) = Tracker::open(Box::new(MemoryStore::new())).unwrap();
        let mut app = App::new(tracker, &AppConfig::default(), Box::new(SilentAlarm), Weekday::Monday);
        for _ in 0..8 {
            handle_key(&mut app, ch('d'));
        }
        assert!(app.tasks().is_empty());
        handle_key(&mut app, ch('d'));
        handle_key(&mut app, ch(' '));
        assert!(app.tasks().is_empty());
        assert_eq!(app.tracker.schedule().tasks(Weekday::Tuesday).len(), 8);
    }

    #[test]
    fn shift_r_asks_before_reset() {
        let mut app = app();
        handle_key(&mut app, shift('R'));
        assert_eq!(app.mode, Mode::Confirm);
        assert_eq!(app.confirm_state.as_ref().unwrap().action, ConfirmAction::ResetWeek);
    }

    #[test]
    fn timer_keys() {
        let mut app = app();
        handle_key(&mut app, ch('t'));
        assert!(app.timer.is_running());
        assert!(app.ticker.is_armed());
        handle_key(&mut app, ch('t'));
        assert!(!app.timer.is_running());

        handle_key(&mut app, ch('3'));
        assert_eq!(app.timer.mode(), TimerMode::LongBreak);
        assert_eq!(app.timer.display(), "15:00");
        handle_key(&mut app, ch('2'));
        assert_eq!(app.timer.display(), "5:00");
        handle_key(&mut app, ch('1'));
        assert_eq!(app.timer.mode(), TimerMode::Focus);
        handle_key(&mut app, ch('r'));
        assert_eq!(app.timer.display(), "25:00");
    }

    #[test]
    fn help_and_quit() {
        let mut app = app();
        handle_key(&mut app, ch('?'));
        assert!(app.show_help);
        // q closes help instead of quitting
        handle_key(&mut app, ch('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
        handle_key(&mut app, ch('q'));
        assert!(app.should_quit);
    }
}
