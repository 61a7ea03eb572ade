use attendance_core::{
    AttendanceRepository, MonthStatus, ReportDto, YearlySummary, ATTENDANCE_TARGET_PERCENT,
    REPORT_COLUMNS,
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph, Row, Table},
};

use crate::tui::app::ReportState;
use crate::tui::ui::THEME;

pub fn draw<R: AttendanceRepository>(
    frame: &mut Frame,
    report: &ReportState<'_, R>,
    header_area: Rect,
    area: Rect,
) {
    draw_header(frame, report.year, header_area);

    let Some(summary) = &report.summary else {
        frame.render_widget(
            Paragraph::new("Attendance data could not be loaded").alignment(Alignment::Center),
            area,
        );
        return;
    };

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // Chart + table
            Constraint::Length(1),      // Gutter
            Constraint::Percentage(30), // Info panel
        ])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Min(8)])
        .split(content_chunks[0]);

    draw_chart(frame, summary, left[0]);
    draw_table(frame, &ReportDto::from_summary(summary), left[1]);
    draw_info_panel(frame, summary, content_chunks[2]);
}

fn draw_header(frame: &mut Frame, year: i32, area: Rect) {
    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(THEME.muted));

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20),
            Constraint::Min(1),
            Constraint::Length(30),
        ])
        .split(area);

    let app_title = Paragraph::new(Span::styled(
        "ATTENDANCE REPORT",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(1, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let nav_text = Line::from(vec![
        Span::styled(" - ", Style::default().fg(THEME.text)),
        Span::styled(
            format!(" Year {} ", year),
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" + ", Style::default().fg(THEME.text)),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 1, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(header_block, area);
}

fn draw_chart(frame: &mut Frame, summary: &YearlySummary, area: Rect) {
    let bar_items: Vec<Bar> = summary
        .statuses()
        .map(|(record, status)| {
            let color = match status {
                MonthStatus::Met => THEME.working,
                MonthStatus::NotMet => THEME.holiday,
                MonthStatus::NoData => THEME.muted,
            };
            let pct = record.attendance_percentage as u64;
            Bar::default()
                .label(&record.month.name()[..3])
                .value(pct)
                .style(Style::default().fg(color))
                .text_value(if pct > 0 { format!("{}%", pct) } else { String::new() })
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(format!(" Monthly Attendance (target {}%) ", ATTENDANCE_TARGET_PERCENT)),
        )
        .bar_width(4)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bar_items))
        .max(100);

    frame.render_widget(chart, area);
}

fn draw_table(frame: &mut Frame, report: &ReportDto, area: Rect) {
    let rows: Vec<Row> = report
        .rows
        .iter()
        .map(|row| {
            let status_style = match row.target_status.as_str() {
                "Met" => Style::default().fg(THEME.working),
                "Not Met" => Style::default().fg(THEME.holiday),
                _ => Style::default().fg(THEME.muted),
            };
            Row::new(vec![
                Span::styled(row.month.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(row.attendance.clone()),
                Span::raw(row.working_days.clone()),
                Span::raw(row.holidays.clone()),
                Span::styled(row.target_status.clone(), status_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(13),
            Constraint::Length(9),
            Constraint::Min(8),
        ],
    )
    .header(Row::new(REPORT_COLUMNS).style(Style::default().fg(Color::Yellow)))
    .block(
        Block::default()
            .title(" Months ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted)),
    );

    frame.render_widget(table, area);
}

fn draw_info_panel(frame: &mut Frame, summary: &YearlySummary, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Summary
            Constraint::Length(3), // Gauge
            Constraint::Min(0),
        ])
        .split(area);

    let info_text = vec![
        Line::from(vec![Span::styled("Summary", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Average:  ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{}%", summary.average_attendance),
                Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Met:      ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{} of {} months", summary.months_above_target, summary.months.len()),
                Style::default().fg(THEME.working).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let info_block = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Year "),
    );
    frame.render_widget(info_block, chunks[0]);

    let average = summary.average_attendance.min(100);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Average Attendance ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(if average >= ATTENDANCE_TARGET_PERCENT {
            THEME.working
        } else {
            THEME.holiday
        }))
        .ratio(f64::from(average) / 100.0)
        .label(format!("{}%", average));

    frame.render_widget(gauge, chunks[1]);
}
