use serde::{Deserialize, Serialize};

use crate::model::record::MonthlyRecord;
use crate::usecase::yearly::{MonthStatus, YearlySummary};

pub const REPORT_COLUMNS: [&str; 5] = ["Month", "Attendance%", "Working Days", "Holidays", "Target Status"];

/// Placeholder for any cell without data.
pub const EMPTY_CELL: &str = "-";

/// One exported line of the yearly report, already formatted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub month: String,
    pub attendance: String,
    pub working_days: String,
    pub holidays: String,
    pub target_status: String,
}

impl ReportRow {
    pub fn from_record(record: &MonthlyRecord) -> Self {
        let has_data = !record.working_days.is_empty();
        let count = |n: usize| if n == 0 { EMPTY_CELL.to_string() } else { n.to_string() };

        Self {
            month: record.month.name().to_string(),
            attendance: if has_data {
                format!("{}%", record.attendance_percentage)
            } else {
                EMPTY_CELL.to_string()
            },
            working_days: count(record.working_days.len()),
            holidays: count(record.holidays.len()),
            target_status: MonthStatus::of(record).label().to_string(),
        }
    }

    pub fn cells(&self) -> [&str; 5] {
        [
            self.month.as_str(),
            self.attendance.as_str(),
            self.working_days.as_str(),
            self.holidays.as_str(),
            self.target_status.as_str(),
        ]
    }
}

/// The summary block and rows handed to the report renderers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportDto {
    pub year: i32,
    pub average_attendance: u32,
    pub months_above_target: usize,
    pub rows: Vec<ReportRow>,
}

impl ReportDto {
    pub fn from_summary(summary: &YearlySummary) -> Self {
        Self {
            year: summary.year,
            average_attendance: summary.average_attendance,
            months_above_target: summary.months_above_target,
            rows: summary.months.iter().map(ReportRow::from_record).collect(),
        }
    }

    pub fn title(&self) -> String {
        format!("Attendance Report - {}", self.year)
    }

    pub fn target_line(&self) -> String {
        format!("{} of {} months met target", self.months_above_target, self.rows.len())
    }

    pub fn file_name(&self) -> String {
        format!("attendance-report-{}.pdf", self.year)
    }
}
