use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

const NAVIGATE_HINTS: &str = "space check  a add  d delete  t timer  ? help";
const EDIT_HINTS: &str = "Enter add  Tab field  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Confirm => {
            let message = app
                .confirm_state
                .as_ref()
                .map(|c| c.message.as_str())
                .unwrap_or_default();
            (
                vec![
                    Span::styled(
                        format!(" {} ", message),
                        Style::default().fg(app.theme.yellow).bg(bg),
                    ),
                    Span::styled(
                        "(y/n)",
                        Style::default()
                            .fg(app.theme.highlight)
                            .bg(bg)
                            .add_modifier(Modifier::BOLD),
                    ),
                ],
                None,
            )
        }
        Mode::Edit => (status_spans(app), Some(EDIT_HINTS)),
        Mode::Navigate => (
            status_spans(app),
            app.show_key_hints.then_some(NAVIGATE_HINTS),
        ),
    };

    // Right-aligned hint when it fits
    if let Some(hint) = hint {
        let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
        let hint_width = unicode::display_width(hint) + 1;
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn status_spans(app: &App) -> Vec<Span<'static>> {
    match &app.status_message {
        Some(message) => {
            let color = if app.status_is_error {
                app.theme.red
            } else {
                app.theme.text
            };
            vec![Span::styled(
                format!(" {}", message),
                Style::default().fg(color).bg(app.theme.background),
            )]
        }
        None => Vec::new(),
    }
}
