use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use attendance_core::{
    render_pdf, AttendanceRepository, AttendanceService, AttendanceUpdated, EditorTimings,
    MonthEditor, MonthKey, ReportDto, YearlyReportUseCase, YearlySummary, MAX_YEAR, MIN_YEAR,
};
use chrono::{Datelike, Days, Local, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Calendar,
    Report,
}

/// Yearly report panel. Reloads whenever the service announces a save.
pub struct ReportState<'a, R: AttendanceRepository> {
    usecase: YearlyReportUseCase<'a, R>,
    updates: Receiver<AttendanceUpdated>,
    pub year: i32,
    pub summary: Option<YearlySummary>,
}

impl<'a, R: AttendanceRepository> ReportState<'a, R> {
    fn new(service: &'a AttendanceService<R>, year: i32) -> Self {
        let mut state = Self {
            usecase: YearlyReportUseCase::new(service),
            updates: service.subscribe(),
            year,
            summary: None,
        };
        state.reload();
        state
    }

    // Storage errors are logged by the service.
    pub fn reload(&mut self) {
        self.summary = self.usecase.get_yearly_summary(self.year).ok();
    }

    pub fn change_year(&mut self, delta: i32) {
        self.year = self.year.saturating_add(delta).clamp(MIN_YEAR, MAX_YEAR);
        self.reload();
    }

    /// Drains pending notifications; reloads once if there were any.
    pub fn refresh_if_updated(&mut self) -> bool {
        if self.updates.try_iter().count() > 0 {
            self.reload();
            return true;
        }
        false
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct App<'a, R: AttendanceRepository> {
    pub editor: MonthEditor<'a, R>,
    pub report: ReportState<'a, R>,
    pub cursor: NaiveDate,
    pub view: View,
    pub message: Option<String>,
    /// Month highlighted in the month/year picker while it is open.
    pub picker: Option<MonthKey>,
    export_dir: PathBuf,
}

impl<'a, R: AttendanceRepository> App<'a, R> {
    pub fn new(
        service: &'a AttendanceService<R>,
        today: NaiveDate,
        timings: EditorTimings,
        export_dir: PathBuf,
    ) -> Self {
        let month = MonthKey::from_date(today);
        App {
            editor: MonthEditor::new(service, month, timings),
            report: ReportState::new(service, today.year()),
            cursor: today,
            view: View::Calendar,
            message: None,
            picker: None,
            export_dir,
        }
    }

    /// Moves the cursor by `days`; crossing a month boundary switches months.
    pub fn move_cursor(&mut self, days: i64, now: Instant) {
        let target = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days as u64))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        let Some(target) = target else { return };
        let Some(month) = MonthKey::new(target.year(), target.month()) else {
            return;
        };

        if month != self.editor.month() {
            self.editor.navigate_to(month, now);
        }
        self.cursor = target;
    }

    pub fn next_month(&mut self, now: Instant) {
        self.editor.next_month(now);
        self.cursor = self.editor.month().first_day();
    }

    pub fn prev_month(&mut self, now: Instant) {
        self.editor.prev_month(now);
        self.cursor = self.editor.month().first_day();
    }

    pub fn open_picker(&mut self) {
        self.picker = Some(self.editor.month());
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Moves the picker highlight by `delta` months, wrapping within its year.
    pub fn picker_step_month(&mut self, delta: i32) {
        if let Some(selected) = self.picker {
            let month0 = (selected.month() as i32 - 1 + delta).rem_euclid(12);
            if let Some(next) = selected.with_month(month0 as u32 + 1) {
                self.picker = Some(next);
            }
        }
    }

    pub fn picker_step_year(&mut self, delta: i32) {
        if let Some(selected) = self.picker {
            if let Some(next) = selected.with_year(selected.year().saturating_add(delta)) {
                self.picker = Some(next);
            }
        }
    }

    /// Jumps the calendar to the picked month.
    pub fn confirm_picker(&mut self, now: Instant) {
        if let Some(month) = self.picker.take() {
            self.editor.navigate_to(month, now);
            self.cursor = month.first_day();
        }
    }

    pub fn click(&mut self, now: Instant) {
        if !self.editor.click(self.cursor, now) {
            self.message = Some("Weekends cannot be marked.".to_string());
        }
    }

    pub fn toggle_holiday(&mut self, now: Instant) {
        if !self.editor.toggle_holiday(self.cursor, now) {
            self.message = Some("Weekends cannot be marked.".to_string());
        }
    }

    pub fn clear(&mut self, now: Instant) {
        self.editor.clear(now);
        self.message = Some(format!("Cleared {}.", self.editor.month()));
    }

    pub fn toggle_view(&mut self, now: Instant) {
        self.view = match self.view {
            View::Calendar => {
                // The report reads from the store, so pending edits go first.
                self.editor.flush(now);
                self.report.refresh_if_updated();
                View::Report
            }
            View::Report => View::Calendar,
        };
    }

    pub fn change_report_year(&mut self, delta: i32) {
        self.report.change_year(delta);
    }

    pub fn export(&mut self) {
        let Some(summary) = &self.report.summary else {
            self.message = Some("Nothing to export.".to_string());
            return;
        };
        let report = ReportDto::from_summary(summary);
        let path = self.export_dir.join(report.file_name());

        let result = render_pdf(&report, today())
            .map_err(|e| e.to_string())
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(|e| e.to_string()));
        self.message = Some(match result {
            Ok(()) => format!("Exported {}", path.display()),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "export failed");
                format!("Export failed: {}", e)
            }
        });
    }

    pub fn tick(&mut self, now: Instant) {
        self.editor.tick(now);
        self.report.refresh_if_updated();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.editor.next_deadline()
    }

    pub fn shutdown(&mut self, now: Instant) {
        self.editor.flush(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::{parse_date, FileAttendanceRepository, SaveStatus};
    use std::time::Duration;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_cursor_crossing_month_loads_next_month() {
        let dir = tempdir().unwrap();
        let service = AttendanceService::new(FileAttendanceRepository::new(dir.path()));
        let mut app = App::new(
            &service,
            date("2025-06-30"),
            EditorTimings::default(),
            dir.path().to_path_buf(),
        );
        let t0 = Instant::now();

        app.click(t0);
        app.move_cursor(1, t0 + Duration::from_millis(10));

        assert_eq!(app.cursor, date("2025-07-01"));
        assert_eq!(app.editor.month(), "2025-07".parse().unwrap());
        // The June edit was written on the way out.
        let june = service.load_month("2025-06".parse().unwrap()).unwrap();
        assert!(june.is_working(date("2025-06-30")));
    }

    #[test]
    fn test_picker_jumps_to_month_and_year() {
        let dir = tempdir().unwrap();
        let service = AttendanceService::new(FileAttendanceRepository::new(dir.path()));
        let mut app = App::new(
            &service,
            date("2025-06-02"),
            EditorTimings::default(),
            dir.path().to_path_buf(),
        );
        let t0 = Instant::now();

        app.click(t0);
        app.open_picker();
        app.picker_step_month(-7);
        assert_eq!(app.picker, Some("2025-11".parse().unwrap()));
        app.picker_step_month(2);
        assert_eq!(app.picker, Some("2025-01".parse().unwrap()));
        app.picker_step_year(-2);
        app.confirm_picker(t0 + Duration::from_millis(10));

        assert!(app.picker.is_none());
        assert_eq!(app.editor.month(), "2023-01".parse().unwrap());
        assert_eq!(app.cursor, date("2023-01-01"));
        // Jumping away wrote the pending June edit.
        let june = service.load_month("2025-06".parse().unwrap()).unwrap();
        assert!(june.is_working(date("2025-06-02")));
    }

    #[test]
    fn test_picker_and_report_stay_within_key_years() {
        let dir = tempdir().unwrap();
        let service = AttendanceService::new(FileAttendanceRepository::new(dir.path()));
        let mut app = App::new(
            &service,
            date("9999-12-01"),
            EditorTimings::default(),
            dir.path().to_path_buf(),
        );

        app.open_picker();
        app.picker_step_year(1);
        assert_eq!(app.picker, Some("9999-12".parse().unwrap()));
        app.close_picker();

        app.move_cursor(31, Instant::now());
        assert_eq!(app.cursor, date("9999-12-01"));

        app.change_report_year(5);
        assert_eq!(app.report.year, MAX_YEAR);
        assert_eq!(app.report.summary.as_ref().unwrap().months.len(), 12);
    }

    #[test]
    fn test_weekend_click_sets_message() {
        let dir = tempdir().unwrap();
        let service = AttendanceService::new(FileAttendanceRepository::new(dir.path()));
        let mut app = App::new(
            &service,
            date("2025-06-07"),
            EditorTimings::default(),
            dir.path().to_path_buf(),
        );

        app.click(Instant::now());

        assert!(app.message.is_some());
        assert_eq!(app.editor.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_report_view_sees_saved_edits() {
        let dir = tempdir().unwrap();
        let service = AttendanceService::new(FileAttendanceRepository::new(dir.path()));
        let mut app = App::new(
            &service,
            date("2025-06-02"),
            EditorTimings::default(),
            dir.path().to_path_buf(),
        );
        let t0 = Instant::now();

        app.click(t0);
        app.toggle_view(t0 + Duration::from_millis(5));

        assert_eq!(app.view, View::Report);
        let summary = app.report.summary.as_ref().unwrap();
        assert_eq!(summary.months[5].working_days.len(), 1);
        assert!(summary.months[5].attendance_percentage > 0);
    }

    #[test]
    fn test_export_writes_pdf() {
        let dir = tempdir().unwrap();
        let service = AttendanceService::new(FileAttendanceRepository::new(dir.path()));
        let mut app = App::new(
            &service,
            date("2025-06-02"),
            EditorTimings::default(),
            dir.path().to_path_buf(),
        );

        app.export();

        let written = std::fs::read(dir.path().join("attendance-report-2025.pdf")).unwrap();
        assert!(written.starts_with(b"%PDF"));
    }
}
