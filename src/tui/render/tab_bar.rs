use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Weekday;
use crate::tui::app::App;
use crate::util::unicode;

const DIVIDER: &str = "\u{2502}";

/// One tab per weekday with its completion, over a rule that joins the
/// dividers
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let [tabs_area, rule_area] = Layout::vertical([Constraint::Length(1); 2]).areas(area);

    let spans = day_tabs(app);
    let mut joints = Vec::with_capacity(Weekday::ALL.len());
    let mut col = 0;
    for span in &spans {
        if span.content == DIVIDER {
            joints.push(col);
        }
        col += unicode::display_width(&span.content);
    }

    let base = Style::default().bg(app.theme.background);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(base), tabs_area);

    let rule: String = (0..rule_area.width as usize)
        .map(|c| if joints.contains(&c) { '\u{2534}' } else { '\u{2500}' })
        .collect();
    frame.render_widget(Paragraph::new(rule).style(base.fg(app.theme.dim)), rule_area);
}

fn day_tabs(app: &App) -> Vec<Span<'static>> {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(" ", Style::default().bg(theme.background))];
    for day in Weekday::ALL {
        let selected = day == app.day;
        let bg = if selected { theme.selection_bg } else { theme.background };
        let label = if selected {
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(bg)
        };
        let pct = app.tracker.stats().day_percentage(day);

        spans.push(Span::styled(format!(" {}", day.short_name()), label));
        if day == app.today {
            spans.push(Span::styled("\u{2022}", Style::default().fg(theme.green).bg(bg)));
        }
        spans.push(Span::styled(
            format!(" {}% ", pct),
            Style::default().fg(theme.percentage_color(pct)).bg(bg),
        ));
        spans.push(Span::styled(DIVIDER, Style::default().fg(theme.dim).bg(theme.background)));
    }
    spans
}
