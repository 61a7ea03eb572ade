use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::calendar::MonthKey;
use crate::model::record::MonthlyRecord;

/// The in-memory marks being edited.
///
/// A date is in at most one of the two sets; every mutation keeps them
/// disjoint. Dates are not restricted to one month, so readers filter by
/// month themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    working_days: BTreeSet<NaiveDate>,
    holidays: BTreeSet<NaiveDate>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: &MonthlyRecord) -> Self {
        let working_days = record.working_days.clone();
        let holidays = record
            .holidays
            .iter()
            .filter(|d| !working_days.contains(*d))
            .copied()
            .collect();
        Self { working_days, holidays }
    }

    pub fn working_days(&self) -> &BTreeSet<NaiveDate> {
        &self.working_days
    }

    pub fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    pub fn is_working(&self, date: NaiveDate) -> bool {
        self.working_days.contains(&date)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn toggle_working(&mut self, date: NaiveDate) {
        if !self.working_days.remove(&date) {
            self.mark_working(date);
        }
    }

    pub fn toggle_holiday(&mut self, date: NaiveDate) {
        if !self.holidays.remove(&date) {
            self.mark_holiday(date);
        }
    }

    pub fn mark_working(&mut self, date: NaiveDate) {
        self.holidays.remove(&date);
        self.working_days.insert(date);
    }

    pub fn mark_holiday(&mut self, date: NaiveDate) {
        self.working_days.remove(&date);
        self.holidays.insert(date);
    }

    /// Returns true if the date carried a mark.
    pub fn unmark(&mut self, date: NaiveDate) -> bool {
        let working = self.working_days.remove(&date);
        let holiday = self.holidays.remove(&date);
        working || holiday
    }

    pub fn clear(&mut self) {
        self.working_days.clear();
        self.holidays.clear();
    }

    pub fn has_marks_in(&self, month: MonthKey) -> bool {
        self.working_days
            .iter()
            .chain(self.holidays.iter())
            .any(|d| month.contains(*d))
    }

    /// Snapshot of the marks that fall inside `month`.
    pub fn to_record(&self, month: MonthKey, attendance_percentage: u32) -> MonthlyRecord {
        let mut record = MonthlyRecord {
            month,
            working_days: self.working_days.clone(),
            holidays: self.holidays.clone(),
            attendance_percentage,
            extra: Default::default(),
        };
        record.retain_month();
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_toggles_keep_sets_disjoint() {
        let d = date("2025-06-10");
        let mut selection = Selection::new();

        selection.toggle_working(d);
        assert!(selection.is_working(d));

        selection.toggle_holiday(d);
        assert!(selection.is_holiday(d));
        assert!(!selection.is_working(d));

        selection.toggle_working(d);
        assert!(selection.is_working(d));
        assert!(!selection.is_holiday(d));

        selection.toggle_working(d);
        assert!(!selection.is_working(d));
        assert!(!selection.is_holiday(d));
    }

    #[test]
    fn test_random_toggle_sequence_never_overlaps() {
        let days: Vec<NaiveDate> = (2..=6).map(|n| date(&format!("2025-06-0{}", n))).collect();
        let mut selection = Selection::new();
        // Deterministic pseudo-random walk over toggles.
        let mut state: u32 = 7;
        for _ in 0..200 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let d = days[(state >> 16) as usize % days.len()];
            if (state >> 8) & 1 == 0 {
                selection.toggle_working(d);
            } else {
                selection.toggle_holiday(d);
            }
            assert!(selection.working_days().is_disjoint(selection.holidays()));
        }
    }

    #[test]
    fn test_to_record_filters_to_month() {
        let june: MonthKey = "2025-06".parse().unwrap();
        let mut selection = Selection::new();
        selection.mark_working(date("2025-05-30"));
        selection.mark_working(date("2025-06-02"));
        selection.mark_holiday(date("2025-06-03"));

        let record = selection.to_record(june, 42);
        assert_eq!(record.month, june);
        assert_eq!(record.working_days.iter().copied().collect::<Vec<_>>(), vec![date("2025-06-02")]);
        assert_eq!(record.holidays.iter().copied().collect::<Vec<_>>(), vec![date("2025-06-03")]);
        assert_eq!(record.attendance_percentage, 42);

        assert!(selection.has_marks_in(june));
        assert!(!selection.has_marks_in(june.succ()));
    }

    #[test]
    fn test_from_record_resolves_overlap_in_favour_of_working() {
        let june: MonthKey = "2025-06".parse().unwrap();
        let d = date("2025-06-05");
        let mut record = MonthlyRecord::empty(june);
        record.working_days.insert(d);
        record.holidays.insert(d);

        let selection = Selection::from_record(&record);
        assert!(selection.is_working(d));
        assert!(!selection.is_holiday(d));
    }

    #[test]
    fn test_unmark() {
        let d = date("2025-06-05");
        let mut selection = Selection::new();
        assert!(!selection.unmark(d));
        selection.mark_holiday(d);
        assert!(selection.unmark(d));
        assert!(!selection.is_holiday(d));
    }
}
