use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let state = app.confirm_state.take();
            app.mode = Mode::Navigate;
            if let Some(state) = state {
                match state.action {
                    ConfirmAction::ResetWeek => confirm_reset_week(app),
                }
            }
        }
        // Anything else declines
        _ => {
            app.confirm_state = None;
            app.mode = Mode::Navigate;
            app.clear_status();
        }
    }
}

fn confirm_reset_week(app: &mut App) {
    let result = app.tracker.reset_all();
    if app.report_store_result(result).is_some() {
        app.set_status("all checkboxes cleared");
    }
}
