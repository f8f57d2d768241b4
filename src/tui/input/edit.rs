use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Keys while the add-habit form is open
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => cancel_add(app),
        (_, KeyCode::Enter) => confirm_add(app),
        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => {
            if let Some(form) = &mut app.add_form {
                form.switch_field();
            }
        }
        (_, KeyCode::Backspace) => {
            if let Some(form) = &mut app.add_form {
                let cursor = form.cursor;
                if let Some(prev) = unicode::prev_grapheme_boundary(form.buffer(), cursor) {
                    form.buffer_mut().replace_range(prev..cursor, "");
                    form.cursor = prev;
                }
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(form) = &mut app.add_form {
                let cursor = form.cursor;
                if let Some(next) = unicode::next_grapheme_boundary(form.buffer(), cursor) {
                    form.buffer_mut().replace_range(cursor..next, "");
                }
            }
        }
        (_, KeyCode::Left) => {
            if let Some(form) = &mut app.add_form
                && let Some(prev) = unicode::prev_grapheme_boundary(form.buffer(), form.cursor)
            {
                form.cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(form) = &mut app.add_form
                && let Some(next) = unicode::next_grapheme_boundary(form.buffer(), form.cursor)
            {
                form.cursor = next;
            }
        }
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            if let Some(form) = &mut app.add_form {
                form.cursor = 0;
            }
        }
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            if let Some(form) = &mut app.add_form {
                form.cursor = form.buffer().len();
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            if let Some(form) = &mut app.add_form {
                let cursor = form.cursor;
                form.buffer_mut().replace_range(..cursor, "");
                form.cursor = 0;
            }
        }
        (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(form) = &mut app.add_form {
                let cursor = form.cursor;
                form.buffer_mut().insert(cursor, c);
                form.cursor += c.len_utf8();
            }
        }
        _ => {}
    }
}

/// Submit the form. A blank label keeps the form open.
fn confirm_add(app: &mut App) {
    let Some(form) = app.add_form.clone() else {
        app.mode = Mode::Navigate;
        return;
    };
    let day = app.day;
    let result = app.tracker.add(day, &form.label, &form.time);
    match app.report_store_result(result) {
        Some(None) => {
            app.set_error("habit name cannot be empty");
            return;
        }
        Some(Some(_)) => {
            let last = app.tasks().len().saturating_sub(1);
            app.set_cursor(last);
            app.set_status(format!("added \"{}\" to {}", form.label.trim(), day));
        }
        // Added in memory but not saved; the error is already showing
        None => {}
    }
    app.add_form = None;
    app.mode = Mode::Navigate;
}

fn cancel_add(app: &mut App) {
    app.add_form = None;
    app.mode = Mode::Navigate;
}
