use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{TimerMode, TimerPhase};
use crate::tui::app::App;
use crate::util::unicode;

use super::bar_spans;

pub const HEADER_HEIGHT: u16 = 5;

const TITLE: &str = "ZenWeekly";
const TAGLINE: &str = "Discipline is the bridge between goals and accomplishment.";
const TIMER_WIDTH: u16 = 28;

/// Title, weekly discipline score and the timer panel
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(TIMER_WIDTH)])
        .split(area);

    render_score(frame, app, chunks[0]);
    render_timer(frame, app, chunks[1]);
}

fn render_score(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let week = app.tracker.stats().week();
    let pct = week.percentage();

    let title_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let mut bar = vec![Span::styled(" ", Style::default().bg(bg))];
    let bar_width = width.saturating_sub(3).min(40);
    bar.extend(bar_spans(
        f64::from(pct) / 100.0,
        bar_width,
        app.theme.percentage_color(pct),
        app.theme.gauge_empty,
        bg,
    ));

    let lines = vec![
        Line::from(Span::styled(format!(" {}", TITLE), title_style)),
        Line::from(Span::styled(
            format!(" {}", unicode::truncate_to_width(TAGLINE, width.saturating_sub(2))),
            dim,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" WEEKLY DISCIPLINE SCORE  ", dim),
            Span::styled(
                format!("{}%", pct),
                Style::default()
                    .fg(app.theme.percentage_color(pct))
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}/{}", week.completed, week.total), dim),
        ]),
        Line::from(bar),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn render_timer(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.panel;
    let timer = &app.timer;
    let inner_width = area.width.saturating_sub(2) as usize;

    // Mode chips
    let mut chips = vec![Span::styled(" ", Style::default().bg(bg))];
    for (i, mode) in TimerMode::ALL.into_iter().enumerate() {
        let style = if mode == timer.mode() {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        chips.push(Span::styled(format!(" {} {} ", i + 1, mode.label()), style));
    }

    let clock_color = match timer.phase() {
        TimerPhase::Running => app.theme.highlight,
        TimerPhase::Expired => app.theme.green,
        TimerPhase::Idle => app.theme.text_bright,
    };
    let clock = timer.display();
    let pad = inner_width.saturating_sub(clock.len()) / 2;

    let mut gauge = vec![Span::styled(" ", Style::default().bg(bg))];
    gauge.extend(bar_spans(
        timer.progress(),
        inner_width,
        app.theme.highlight,
        app.theme.gauge_empty,
        bg,
    ));

    let action = if timer.is_running() {
        "Pause"
    } else {
        "Start Focus"
    };
    let action_line = Line::from(vec![
        Span::styled(" [t] ", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(action, Style::default().fg(app.theme.text).bg(bg)),
        Span::styled("  [r] Reset", Style::default().fg(app.theme.dim).bg(bg)),
    ]);

    let lines = vec![
        Line::from(chips),
        Line::from(Span::styled(
            format!("{}{}", " ".repeat(pad + 1), clock),
            Style::default()
                .fg(clock_color)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(gauge),
        action_line,
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
