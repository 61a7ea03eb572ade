use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{is_weekend, MonthKey};
use crate::model::selection::Selection;

/// Share of available weekdays that must be worked, in percent.
pub const ATTENDANCE_TARGET_PERCENT: u32 = 60;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyStats {
    pub total_working_days: u32,
    pub holiday_count: u32,
    pub required_working_days: u32,
    pub current_attendance: u32,
    pub attendance_percentage: u32,
    pub remaining_days: u32,
}

impl MonthlyStats {
    /// Derives the month's figures from a selection.
    ///
    /// Weekends never count, whatever marks they carry, and dates outside
    /// `month` are ignored.
    pub fn compute(month: MonthKey, selection: &Selection) -> Self {
        let total_working_days = month.days().filter(|d| !is_weekend(*d)).count() as u32;
        let holiday_count = count_weekdays_in(month, selection.holidays());
        let current_attendance = count_weekdays_in(month, selection.working_days());

        let available = total_working_days.saturating_sub(holiday_count);
        let required_working_days = ceil_div(available * ATTENDANCE_TARGET_PERCENT, 100);
        let attendance_percentage = if available == 0 {
            0
        } else {
            // round(current / available * 100), halves rounding up
            ((current_attendance * 200 + available) / (available * 2)).min(100)
        };

        Self {
            total_working_days,
            holiday_count,
            required_working_days,
            current_attendance,
            attendance_percentage,
            remaining_days: required_working_days.saturating_sub(current_attendance),
        }
    }

    pub fn met_target(&self) -> bool {
        self.attendance_percentage >= ATTENDANCE_TARGET_PERCENT
    }

    pub fn remaining_message(&self) -> String {
        match self.remaining_days {
            0 => "You have met the attendance requirement for this month!".to_string(),
            1 => format!(
                "You need 1 more office day to meet the {}% requirement.",
                ATTENDANCE_TARGET_PERCENT
            ),
            n => format!(
                "You need {} more office days to meet the {}% requirement.",
                n, ATTENDANCE_TARGET_PERCENT
            ),
        }
    }
}

fn count_weekdays_in(month: MonthKey, dates: &BTreeSet<NaiveDate>) -> u32 {
    dates
        .iter()
        .filter(|d| month.contains(**d) && !is_weekend(**d))
        .count() as u32
}

fn ceil_div(numerator: u32, denominator: u32) -> u32 {
    (numerator + denominator - 1) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn mark(selection: &mut Selection, working: &[&str], holidays: &[&str]) {
        for d in working {
            selection.mark_working(parse_date(d).unwrap());
        }
        for d in holidays {
            selection.mark_holiday(parse_date(d).unwrap());
        }
    }

    #[test]
    fn test_thirty_day_month_with_22_weekdays() {
        // September 2025 starts on a Monday: 22 weekdays, 8 weekend days.
        let mut selection = Selection::new();
        mark(
            &mut selection,
            &[
                "2025-09-01", "2025-09-02", "2025-09-03", "2025-09-04", "2025-09-05",
                "2025-09-08", "2025-09-09", "2025-09-10", "2025-09-11", "2025-09-12",
            ],
            &["2025-09-15", "2025-09-16"],
        );

        let stats = MonthlyStats::compute(month("2025-09"), &selection);
        assert_eq!(stats.total_working_days, 22);
        assert_eq!(stats.holiday_count, 2);
        assert_eq!(stats.required_working_days, 12);
        assert_eq!(stats.current_attendance, 10);
        assert_eq!(stats.attendance_percentage, 50);
        assert_eq!(stats.remaining_days, 2);
        assert!(!stats.met_target());
    }

    #[test]
    fn test_june_2025() {
        // June 2025 starts on a Sunday and has 21 weekdays.
        let mut selection = Selection::new();
        mark(
            &mut selection,
            &[
                "2025-06-02", "2025-06-03", "2025-06-04", "2025-06-05", "2025-06-06",
                "2025-06-09", "2025-06-10", "2025-06-11", "2025-06-12", "2025-06-13",
            ],
            &["2025-06-16", "2025-06-17"],
        );

        let stats = MonthlyStats::compute(month("2025-06"), &selection);
        assert_eq!(stats.total_working_days, 21);
        assert_eq!(stats.holiday_count, 2);
        assert_eq!(stats.required_working_days, 12); // ceil(19 * 0.6)
        assert_eq!(stats.attendance_percentage, 53); // round(10 / 19 * 100)
        assert_eq!(stats.remaining_days, 2);
    }

    #[test]
    fn test_empty_month_has_no_division_error() {
        let stats = MonthlyStats::compute(month("2025-09"), &Selection::new());
        assert_eq!(stats.attendance_percentage, 0);
        assert_eq!(stats.current_attendance, 0);
        assert_eq!(stats.required_working_days, 14); // ceil(22 * 0.6)
        assert_eq!(stats.remaining_days, stats.required_working_days);
    }

    #[test]
    fn test_every_weekday_a_holiday_gives_zero_percent() {
        let m = month("2025-09");
        let mut selection = Selection::new();
        for d in m.days().filter(|d| !is_weekend(*d)) {
            selection.mark_holiday(d);
        }
        let stats = MonthlyStats::compute(m, &selection);
        assert_eq!(stats.total_working_days, stats.holiday_count);
        assert_eq!(stats.attendance_percentage, 0);
        assert_eq!(stats.required_working_days, 0);
        assert_eq!(stats.remaining_days, 0);
    }

    #[test]
    fn test_weekend_marks_are_ignored() {
        let m = month("2025-09");
        let mut plain = Selection::new();
        mark(&mut plain, &["2025-09-01", "2025-09-02"], &["2025-09-03"]);

        let mut with_weekends = plain.clone();
        mark(&mut with_weekends, &["2025-09-06", "2025-09-07"], &["2025-09-13"]);

        assert_eq!(
            MonthlyStats::compute(m, &plain),
            MonthlyStats::compute(m, &with_weekends)
        );
    }

    #[test]
    fn test_dates_from_other_months_are_ignored() {
        let mut selection = Selection::new();
        mark(&mut selection, &["2025-08-29", "2025-10-01"], &["2025-08-28"]);
        let stats = MonthlyStats::compute(month("2025-09"), &selection);
        assert_eq!(stats.current_attendance, 0);
        assert_eq!(stats.holiday_count, 0);
    }

    #[test]
    fn test_full_attendance_is_capped_at_100() {
        let m = month("2025-09");
        let mut selection = Selection::new();
        for d in m.days() {
            selection.mark_working(d);
        }
        let stats = MonthlyStats::compute(m, &selection);
        assert_eq!(stats.attendance_percentage, 100);
        assert!(stats.met_target());
        assert_eq!(stats.remaining_days, 0);
    }

    #[test]
    fn test_percentage_rounds_halves_up() {
        // 22 weekdays, 14 holidays -> 8 available; 1 worked = 12.5%
        let m = month("2025-09");
        let weekdays: Vec<NaiveDate> = m.days().filter(|d| !is_weekend(*d)).collect();
        let mut selection = Selection::new();
        for d in &weekdays[..14] {
            selection.mark_holiday(*d);
        }
        selection.mark_working(weekdays[14]);
        let stats = MonthlyStats::compute(m, &selection);
        assert_eq!(stats.attendance_percentage, 13);
        assert_eq!(stats.required_working_days, 5); // ceil(4.8)
    }

    #[test]
    fn test_remaining_message() {
        let mut stats = MonthlyStats::default();
        stats.remaining_days = 1;
        assert_eq!(stats.remaining_message(), "You need 1 more office day to meet the 60% requirement.");
        stats.remaining_days = 3;
        assert_eq!(stats.remaining_message(), "You need 3 more office days to meet the 60% requirement.");
        stats.remaining_days = 0;
        assert!(stats.remaining_message().starts_with("You have met"));
    }
}
