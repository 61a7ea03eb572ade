
#[cfg(test)]
mod tests {
    use crate::calendar::{parse_date, MonthKey};
    use crate::error::{AttendanceError, Result};
    use crate::model::record::MonthlyRecord;
    use crate::repository::AttendanceRepository;
    use crate::service::attendance_service::AttendanceService;
    use crate::usecase::yearly::{MonthStatus, YearlyReportUseCase, YearlySummary};

    struct MockRepo {
        records: Vec<MonthlyRecord>,
    }

    impl AttendanceRepository for MockRepo {
        fn upsert(&self, _record: MonthlyRecord) -> Result<()> { unimplemented!() }
        fn get(&self, _month: MonthKey) -> Result<Option<MonthlyRecord>> { unimplemented!() }
        fn delete(&self, _month: MonthKey) -> Result<()> { unimplemented!() }
        fn list(&self) -> Result<Vec<MonthlyRecord>> { Ok(self.records.clone()) }
    }

    fn record(month: &str, working: &[&str], pct: u32) -> MonthlyRecord {
        let mut r = MonthlyRecord::empty(month.parse().unwrap());
        r.working_days = working.iter().map(|d| parse_date(d).unwrap()).collect();
        r.attendance_percentage = pct;
        r
    }

    #[test]
    fn test_empty_store_yields_twelve_empty_slots() {
        let summary = YearlySummary::build(2025, Vec::new()).unwrap();

        assert_eq!(summary.months.len(), 12);
        let keys: Vec<String> = summary.months.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(keys.first().unwrap(), "2025-01");
        assert_eq!(keys.last().unwrap(), "2025-12");
        assert!(summary.months.iter().all(|m| m.is_empty()));
        assert_eq!(summary.average_attendance, 0);
        assert_eq!(summary.months_above_target, 0);
        assert!(summary.statuses().all(|(_, s)| s == MonthStatus::NoData));
    }

    #[test]
    fn test_missing_months_count_as_zero() {
        // Stored out of order, with one record from another year.
        let records = vec![
            record("2025-03", &["2025-03-03"], 80),
            record("2024-12", &["2024-12-02"], 100),
            record("2025-01", &["2025-01-02"], 50),
        ];

        let summary = YearlySummary::build(2025, records).unwrap();

        assert_eq!(summary.months[0].attendance_percentage, 50);
        assert_eq!(summary.months[1].attendance_percentage, 0);
        assert_eq!(summary.months[2].attendance_percentage, 80);
        // round(130 / 12) = round(10.83)
        assert_eq!(summary.average_attendance, 11);
        assert_eq!(summary.months_above_target, 1);
    }

    #[test]
    fn test_average_rounds_half_up() {
        // 6 / 12 = 0.5
        let summary = YearlySummary::build(2025, vec![record("2025-05", &["2025-05-01"], 6)]).unwrap();
        assert_eq!(summary.average_attendance, 1);
    }

    #[test]
    fn test_month_status() {
        let summary = YearlySummary::build(
            2025,
            vec![
                record("2025-01", &["2025-01-02"], 60),
                record("2025-02", &["2025-02-03"], 59),
                record("2025-03", &[], 0),
            ],
        ).unwrap();
        let statuses: Vec<MonthStatus> = summary.statuses().map(|(_, s)| s).take(3).collect();
        assert_eq!(statuses, vec![MonthStatus::Met, MonthStatus::NotMet, MonthStatus::NoData]);
        assert_eq!(MonthStatus::NotMet.label(), "Not Met");
        assert_eq!(MonthStatus::NoData.label(), "-");
    }

    #[test]
    fn test_usecase_reads_through_service() {
        let repo = MockRepo {
            records: vec![record("2025-06", &["2025-06-02"], 70), record("2025-07", &["2025-07-01"], 65)],
        };
        let service = AttendanceService::new(repo);
        let usecase = YearlyReportUseCase::new(&service);

        let summary = usecase.get_yearly_summary(2025).unwrap();
        assert_eq!(summary.year, 2025);
        assert_eq!(summary.months_above_target, 2);
        assert_eq!(summary.average_attendance, 11); // round(135 / 12)
    }

    #[test]
    fn test_oversized_stored_percentage_is_capped() {
        let summary = YearlySummary::build(
            2025,
            vec![
                record("2025-01", &["2025-01-02"], 3_000_000_000),
                record("2025-02", &["2025-02-03"], u32::MAX),
            ],
        )
        .unwrap();

        assert_eq!(summary.months[0].attendance_percentage, 100);
        assert_eq!(summary.months[1].attendance_percentage, 100);
        // round(200 / 12)
        assert_eq!(summary.average_attendance, 17);
        assert_eq!(summary.months_above_target, 2);
    }

    #[test]
    fn test_unrepresentable_year_is_an_error() {
        assert!(matches!(
            YearlySummary::build(300_000, Vec::new()),
            Err(AttendanceError::InvalidYear(300_000))
        ));

        let service = AttendanceService::new(MockRepo { records: Vec::new() });
        let usecase = YearlyReportUseCase::new(&service);
        assert!(usecase.get_yearly_summary(-5).is_err());
        assert_eq!(usecase.get_yearly_summary(9999).unwrap().months.len(), 12);
    }
}
