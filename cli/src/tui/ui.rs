use attendance_core::{
    calendar_grid, is_weekend, AttendanceRepository, MonthKey, SaveStatus,
    ATTENDANCE_TARGET_PERCENT,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::app::{today, App, View};
use crate::tui::report_view;

// --- THEME ---
pub(crate) struct Theme {
    pub primary: Color,
    pub muted: Color,
    pub text: Color,
    pub working: Color,
    pub holiday: Color,
    pub warn: Color,
}

pub(crate) const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    working: Color::Green,
    holiday: Color::Red,
    warn: Color::Yellow,
};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn draw<R: AttendanceRepository>(f: &mut Frame, app: &App<'_, R>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    match app.view {
        View::Calendar => {
            draw_header(f, app, main_chunks[0]);
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(45), Constraint::Min(30)])
                .split(main_chunks[1]);
            draw_calendar(f, app, content_chunks[0]);
            draw_stats_panel(f, app, content_chunks[1]);
        }
        View::Report => report_view::draw(f, &app.report, main_chunks[0], main_chunks[1]),
    }

    draw_footer(f, app, main_chunks[2]);

    if let Some(selected) = app.picker {
        draw_picker(f, selected, size);
    }
}

fn draw_header<R: AttendanceRepository>(f: &mut Frame, app: &App<'_, R>, area: Rect) {
    let month = app.editor.month();
    let title = format!(" {} {} ", month.name(), month.year());
    let status = match app.editor.status() {
        SaveStatus::Idle => Span::raw(""),
        SaveStatus::Saving => Span::styled("Saving...", Style::default().fg(THEME.warn)),
        SaveStatus::Saved => Span::styled("Saved!", Style::default().fg(THEME.working)),
    };

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(title.width() as u16 + 8),
            Constraint::Min(1),
            Constraint::Length(12),
        ])
        .split(area);

    let nav = Paragraph::new(Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.muted)),
        Span::styled(title, Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(THEME.muted)),
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)));
    f.render_widget(nav, header_layout[0]);

    f.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        header_layout[1],
    );

    let status = Paragraph::new(Line::from(status))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)));
    f.render_widget(status, header_layout[2]);
}

fn draw_calendar<R: AttendanceRepository>(f: &mut Frame, app: &App<'_, R>, area: Rect) {
    let month = app.editor.month();
    let selection = app.editor.selection();
    let today = today();

    let rows: Vec<Row> = calendar_grid(month)
        .into_iter()
        .map(|week| {
            let cells: Vec<Cell> = week
                .iter()
                .map(|day| {
                    let mut style = if !month.contains(*day) || is_weekend(*day) {
                        Style::default().fg(THEME.muted)
                    } else if selection.is_working(*day) {
                        Style::default().fg(Color::Black).bg(THEME.working)
                    } else if selection.is_holiday(*day) {
                        Style::default().fg(Color::Black).bg(THEME.holiday)
                    } else {
                        Style::default().fg(THEME.text)
                    };
                    if *day == today {
                        style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                    }
                    if *day == app.cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Cell::from(Span::styled(format!(" {:>2} ", day.format("%-d")), style))
                })
                .collect();
            Row::new(cells).height(2)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(5); 7])
        .header(
            Row::new(WEEKDAYS.iter().map(|d| Cell::from(*d)))
                .style(Style::default().fg(THEME.warn)),
        )
        .column_spacing(1)
        .block(
            Block::default()
                .title(" Calendar ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        );

    f.render_widget(table, area);
}

fn draw_stats_panel<R: AttendanceRepository>(f: &mut Frame, app: &App<'_, R>, area: Rect) {
    let stats = app.editor.stats();
    let pct_color = if stats.met_target() { THEME.working } else { THEME.holiday };

    let label = |name: &'static str| Span::styled(name, Style::default().fg(THEME.muted));
    let value = |v: String| Span::styled(v, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD));

    let lines = vec![
        Line::from(Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![label("Working Days:   "), value(stats.total_working_days.to_string())]),
        Line::from(vec![label("Holidays:       "), value(stats.holiday_count.to_string())]),
        Line::from(vec![label("Required Days:  "), value(stats.required_working_days.to_string())]),
        Line::from(vec![label("Office Days:    "), value(stats.current_attendance.to_string())]),
        Line::from(vec![
            label("Attendance:     "),
            Span::styled(
                format!("{}%", stats.attendance_percentage),
                Style::default().fg(pct_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" (target {}%)", ATTENDANCE_TARGET_PERCENT),
                Style::default().fg(THEME.muted),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(stats.remaining_message(), Style::default().fg(pct_color))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", Style::default().bg(THEME.working)),
            Span::raw(" office  "),
            Span::styled("  ", Style::default().bg(THEME.holiday)),
            Span::raw(" holiday"),
        ]),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Summary ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted)),
    );
    f.render_widget(panel, area);
}

// Months laid out three to a row.
fn draw_picker(f: &mut Frame, selected: MonthKey, area: Rect) {
    let width = 34.min(area.width);
    let height = 9.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" < ", Style::default().fg(THEME.muted)),
            Span::styled(
                selected.year().to_string(),
                Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" > ", Style::default().fg(THEME.muted)),
        ])
        .alignment(Alignment::Center),
        Line::from(""),
    ];
    for row in MonthKey::months_of(selected.year()).unwrap_or_default().chunks(3) {
        let spans: Vec<Span> = row
            .iter()
            .map(|month| {
                let style = if *month == selected {
                    Style::default().fg(THEME.text).add_modifier(Modifier::REVERSED)
                } else {
                    Style::default().fg(THEME.text)
                };
                Span::styled(format!(" {:<9}", month.name()), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let picker = Paragraph::new(lines).block(
        Block::default()
            .title(" Go to month ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.primary)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(picker, popup);
}

fn draw_footer<R: AttendanceRepository>(f: &mut Frame, app: &App<'_, R>, area: Rect) {
    let help = match (app.picker, app.view) {
        (Some(_), _) => "hjkl: Month | +/-: Year | enter: Go | esc: Cancel",
        (None, View::Calendar) => "hjkl: Move | space: Office (x2 Holiday) | H: Holiday | n/p: Month | g: Go to | c: Clear | tab: Report | q: Quit",
        (None, View::Report) => "+/-: Year | e: Export PDF | tab: Calendar | q: Quit",
    };
    let text = match &app.message {
        Some(message) => Span::styled(fit(message, area.width as usize), Style::default().fg(THEME.warn)),
        None => Span::raw(fit(help, area.width as usize)),
    };
    let footer = Paragraph::new(Line::from(text))
        .style(Style::default().fg(THEME.muted))
        .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

/// Truncates `text` to at most `width` terminal columns.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
