use attendance_core::{
    calendar_grid, is_weekend, MonthKey, MonthlyStats, ReportDto, Selection,
};
use tabled::builder::Builder;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

// Helper struct for Table Row
#[derive(Tabled)]
struct ReportTableRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Attendance%")]
    attendance: String,
    #[tabled(rename = "Working Days")]
    working_days: String,
    #[tabled(rename = "Holidays")]
    holidays: String,
    #[tabled(rename = "Target Status")]
    target_status: String,
}

pub fn show_report(report: &ReportDto) {
    println!("\n\x1b[1;36m{}\x1b[0m", report.title());
    println!("Average Attendance: {}%", report.average_attendance);
    println!("Target Achievement: {}", report.target_line());

    let rows: Vec<ReportTableRow> = report
        .rows
        .iter()
        .map(|row| ReportTableRow {
            month: row.month.clone(),
            attendance: row.attendance.clone(),
            working_days: row.working_days.clone(),
            holidays: row.holidays.clone(),
            target_status: row.target_status.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

    println!("{}", table);
}

pub fn show_month(month: MonthKey, selection: &Selection, stats: &MonthlyStats) {
    println!("\n\x1b[1;36m{} {}\x1b[0m", month.name(), month.year());

    let mut builder = Builder::default();
    builder.push_record(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
    for week in calendar_grid(month) {
        builder.push_record(week.iter().map(|day| {
            if !month.contains(*day) {
                String::new()
            } else if selection.is_working(*day) && !is_weekend(*day) {
                format!("{} W", day.format("%-d"))
            } else if selection.is_holiday(*day) && !is_weekend(*day) {
                format!("{} H", day.format("%-d"))
            } else {
                day.format("%-d").to_string()
            }
        }));
    }
    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);

    println!("Total Working Days:   {}", stats.total_working_days);
    println!("Total Holidays:       {}", stats.holiday_count);
    println!("Required Office Days: {}", stats.required_working_days);
    println!("Attendance:           {}%", stats.attendance_percentage);
    println!("{}", stats.remaining_message());
}
