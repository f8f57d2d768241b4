use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::TaskRecord;
use crate::tui::app::{AddField, AddForm, App, Mode};
use crate::util::unicode;

const LABEL_PLACEHOLDER: &str = "Habit name...";
const TIME_PLACEHOLDER: &str = "Time (e.g. 06:00 AM)";

/// The selected day's habits, plus the add form while it is open
pub fn render_day_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let height = area.height as usize;

    let mut lines = vec![day_title(app), Line::from("")];

    let form_rows = if app.mode == Mode::Edit { 3 } else { 0 };
    let list_rows = height.saturating_sub(lines.len() + form_rows);

    let tasks = app.tasks();
    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No habits for this day.",
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        )));
    } else {
        // Keep the cursor row on screen
        let cursor = app.cursor();
        let scroll = if list_rows == 0 {
            0
        } else {
            cursor.saturating_sub(list_rows - 1)
        };
        for (i, task) in tasks.iter().enumerate().skip(scroll).take(list_rows) {
            let selected = i == cursor && app.mode == Mode::Navigate;
            lines.push(task_line(app, task, selected, width));
        }
    }

    if let Some(form) = app.add_form.as_ref().filter(|_| app.mode == Mode::Edit) {
        lines.push(Line::from(""));
        lines.push(form_line(app, form, AddField::Label, width));
        lines.push(form_line(app, form, AddField::Time, width));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn day_title(app: &App) -> Line<'static> {
    let bg = app.theme.background;
    let c = app.tracker.stats().day(app.day);
    let pct = c.percentage();
    let mut spans = vec![
        Span::styled(
            format!(" {}", app.day),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}/{}  ", c.completed, c.total),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
        Span::styled(
            format!("{}%", pct),
            Style::default()
                .fg(app.theme.percentage_color(pct))
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if app.day == app.today {
        spans.push(Span::styled(
            "  TODAY",
            Style::default().fg(app.theme.green).bg(bg).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn task_line(app: &App, task: &TaskRecord, selected: bool, width: usize) -> Line<'static> {
    let row_bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let (check, check_color) = if task.completed {
        ("[x]", app.theme.green)
    } else {
        ("[ ]", app.theme.text)
    };
    let mut label_style = Style::default().fg(app.theme.text_bright).bg(row_bg);
    let mut time_style = Style::default().fg(app.theme.cyan).bg(row_bg);
    if task.completed {
        label_style = label_style
            .fg(app.theme.dim)
            .add_modifier(Modifier::CROSSED_OUT);
        time_style = time_style.fg(app.theme.dim);
    }
    if selected {
        label_style = label_style.add_modifier(Modifier::BOLD);
    }

    let marker = if selected { "\u{25B8}" } else { " " };
    let prefix = format!("{} {} ", marker, check);
    let time = unicode::pad_to_width(&task.time, 9);
    let used = unicode::display_width(&prefix) + unicode::display_width(&time) + 1;
    let label = unicode::truncate_to_width(&task.label, width.saturating_sub(used));
    let pad = width.saturating_sub(used + unicode::display_width(&label));

    Line::from(vec![
        Span::styled(
            format!("{} ", marker),
            Style::default().fg(app.theme.highlight).bg(row_bg),
        ),
        Span::styled(format!("{} ", check), Style::default().fg(check_color).bg(row_bg)),
        Span::styled(time, time_style),
        Span::styled(" ", Style::default().bg(row_bg)),
        Span::styled(label, label_style),
        Span::styled(" ".repeat(pad), Style::default().bg(row_bg)),
    ])
}

fn form_line(app: &App, form: &AddForm, field: AddField, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let focused = form.field == field;
    let (prompt, value, placeholder) = match field {
        AddField::Label => ("  + ", form.label.as_str(), LABEL_PLACEHOLDER),
        AddField::Time => ("    ", form.time.as_str(), TIME_PLACEHOLDER),
    };
    let prompt_style = Style::default().fg(app.theme.highlight).bg(bg);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor_style = Style::default().fg(app.theme.highlight).bg(bg);
    let max = width.saturating_sub(prompt.len() + 1);

    let mut spans = vec![Span::styled(prompt, prompt_style)];
    if value.is_empty() {
        if focused {
            spans.push(Span::styled("\u{258C}", cursor_style));
        }
        spans.push(Span::styled(
            placeholder,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    } else if focused {
        let (before, after) = value.split_at(form.cursor.min(value.len()));
        spans.push(Span::styled(unicode::truncate_to_width(before, max), text_style));
        spans.push(Span::styled("\u{258C}", cursor_style));
        spans.push(Span::styled(after.to_string(), text_style));
    } else {
        spans.push(Span::styled(unicode::truncate_to_width(value, max), text_style));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weekday;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyCode;

    fn day_text(app: &App) -> String {
        render_to_string(TERM_W, 14, |frame, area| render_day_view(frame, app, area))
    }

    #[test]
    fn lists_habits_with_times_and_checkboxes() {
        let mut app = test_app();
        complete_first(&mut app, Weekday::Wednesday, 1);
        let out = day_text(&app);
        assert!(out.contains("Wednesday  1/8  13%  TODAY"));
        assert!(out.contains("[x] 06:00 AM  Wake up on time"));
        assert!(out.contains("[ ] 11:00 PM  Sleep on time"));
    }

    #[test]
    fn other_days_are_not_marked_today() {
        let mut app = test_app();
        app.select_day(Weekday::Monday);
        let out = day_text(&app);
        assert!(out.contains("Monday  0/8  0%"));
        assert!(!out.contains("TODAY"));
    }

    #[test]
    fn empty_day_message() {
        let mut app = test_app();
        for _ in 0..8 {
            handle_key(&mut app, ch('d'));
        }
        let out = day_text(&app);
        assert!(out.contains("No habits for this day."));
        assert!(out.contains("0/0  0%"));
    }

    #[test]
    fn add_form_shows_placeholders_then_input() {
        let mut app = test_app();
        handle_key(&mut app, ch('a'));
        let out = day_text(&app);
        assert!(out.contains("+ \u{258C}Habit name..."));
        assert!(out.contains("Time (e.g. 06:00 AM)"));

        type_text(&mut app, "Read");
        handle_key(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "7pm");
        let out = day_text(&app);
        assert!(out.contains("+ Read"));
        assert!(out.contains("7pm\u{258C}"));
    }

    #[test]
    fn long_lists_scroll_to_cursor() {
        let mut app = test_app();
        handle_key(&mut app, ch('G'));
        let out = render_to_string(TERM_W, 6, |frame, area| render_day_view(frame, &app, area));
        assert!(out.contains("Sleep on time"));
        assert!(!out.contains("Wake up on time"));
    }
}
