use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Days",
        &[
            (" \u{2190}\u{2192}/hl/Tab", "Previous / next day"),
            (" .", "Jump to today"),
        ],
    ),
    (
        "Habits",
        &[
            (" \u{2191}\u{2193}/jk", "Move cursor"),
            (" g/G", "Jump to top / bottom"),
            (" Space/x/Enter", "Check / uncheck"),
            (" a", "Add a habit (Tab: time field)"),
            (" d", "Delete habit"),
            (" R", "Reset the week's checkboxes"),
        ],
    ),
    (
        "Timer",
        &[
            (" t", "Start / pause"),
            (" 1/2/3", "Focus / short / long break"),
            (" r", "Reset timer"),
        ],
    ),
    ("", &[(" ?", "Toggle this help"), (" q", "Quit")]),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 90, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];
    for (title, bindings) in SECTIONS {
        if !title.is_empty() {
            lines.push(Line::from(Span::styled(format!(" {}", title), header_style)));
        }
        for (keys, desc) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<16}", keys), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// A rect centered in `area`, sized by percentage
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
