use std::collections::HashMap;

use serde::Serialize;

use crate::calendar::MonthKey;
use crate::error::Result;
use crate::model::record::MonthlyRecord;
use crate::model::stats::ATTENDANCE_TARGET_PERCENT;
use crate::repository::AttendanceRepository;
use crate::service::attendance_service::AttendanceService;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStatus {
    NoData,
    Met,
    NotMet,
}

impl MonthStatus {
    pub fn of(record: &MonthlyRecord) -> Self {
        if record.working_days.is_empty() {
            MonthStatus::NoData
        } else if record.attendance_percentage >= ATTENDANCE_TARGET_PERCENT {
            MonthStatus::Met
        } else {
            MonthStatus::NotMet
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MonthStatus::NoData => "-",
            MonthStatus::Met => "Met",
            MonthStatus::NotMet => "Not Met",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct YearlySummary {
    pub year: i32,
    /// January through December; months with nothing stored are empty records.
    pub months: Vec<MonthlyRecord>,
    pub average_attendance: u32,
    pub months_above_target: usize,
}

impl YearlySummary {
    /// Builds the twelve-month view for `year` from an unordered scan.
    ///
    /// Missing months count as 0% in the average. Stored percentages are
    /// capped at 100 since they are not validated on read.
    pub fn build(year: i32, records: impl IntoIterator<Item = MonthlyRecord>) -> Result<Self> {
        let keys = MonthKey::months_of(year)?;
        let mut by_month: HashMap<MonthKey, MonthlyRecord> = records
            .into_iter()
            .filter(|r| r.month.year() == year)
            .map(|r| (r.month, r))
            .collect();

        let months: Vec<MonthlyRecord> = keys
            .into_iter()
            .map(|m| by_month.remove(&m).unwrap_or_else(|| MonthlyRecord::empty(m)))
            .map(|mut m| {
                m.attendance_percentage = m.attendance_percentage.min(100);
                m
            })
            .collect();

        let total: u32 = months.iter().map(|m| m.attendance_percentage).sum();
        // round(total / 12)
        let average_attendance = (total * 2 + 12) / 24;
        let months_above_target = months
            .iter()
            .filter(|m| m.attendance_percentage >= ATTENDANCE_TARGET_PERCENT)
            .count();

        Ok(Self {
            year,
            months,
            average_attendance,
            months_above_target,
        })
    }

    pub fn statuses(&self) -> impl Iterator<Item = (&MonthlyRecord, MonthStatus)> {
        self.months.iter().map(|m| (m, MonthStatus::of(m)))
    }
}

pub struct YearlyReportUseCase<'a, R: AttendanceRepository> {
    service: &'a AttendanceService<R>,
}

impl<'a, R: AttendanceRepository> YearlyReportUseCase<'a, R> {
    pub fn new(service: &'a AttendanceService<R>) -> Self {
        Self { service }
    }

    pub fn get_yearly_summary(&self, year: i32) -> Result<YearlySummary> {
        let records = self.service.records()?;
        tracing::debug!(year, stored = records.len(), "building yearly summary");
        YearlySummary::build(year, records)
    }
}
