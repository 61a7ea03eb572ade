pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod notify;
pub mod repository;
pub mod service;
pub mod usecase;

pub use calendar::{calendar_grid, format_date, is_weekend, parse_date, MonthKey, MAX_YEAR, MIN_YEAR};
pub use config::Config;
pub use error::{AttendanceError, Result};
pub use export::render_pdf;
pub use model::record::MonthlyRecord;
pub use model::selection::Selection;
pub use model::stats::{MonthlyStats, ATTENDANCE_TARGET_PERCENT};
pub use notify::{AttendanceUpdated, UpdateNotifier};
pub use repository::{AttendanceRepository, FileAttendanceRepository};
pub use service::attendance_service::{AttendanceService, SaveOutcome};
pub use service::dto::{ReportDto, ReportRow, REPORT_COLUMNS};
pub use usecase::editor::{EditorTimings, MonthEditor, SaveStatus};
pub use usecase::yearly::{MonthStatus, YearlyReportUseCase, YearlySummary};
