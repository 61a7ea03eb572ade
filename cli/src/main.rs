mod logging;
mod report;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use attendance_core::{
    format_date, is_weekend, parse_date, render_pdf, AttendanceService, Config,
    FileAttendanceRepository, MonthKey, MonthlyStats, ReportDto, SaveOutcome,
    YearlyReportUseCase, MAX_YEAR, MIN_YEAR,
};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;

#[derive(Parser)]
#[command(name = "attendance")]
#[command(about = "Track office attendance against the 60% policy", long_about = None)]
struct Cli {
    /// Directory holding the attendance store (default: ~/.attendance)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the Terminal User Interface
    Tui,
    /// Mark a day as worked in the office (usage: mark 2025-06-02)
    Mark { date: String },
    /// Mark a day as a holiday
    Holiday { date: String },
    /// Remove any mark from a day
    Unmark { date: String },
    /// Delete every mark of a month (usage: clear 2025-06)
    Clear { month: String },
    /// Show attendance figures for a month (default: current month)
    Stats { month: Option<String> },
    /// Print the yearly summary (default: current year)
    Report {
        #[arg(value_parser = year_parser())]
        year: Option<i32>,
    },
    /// Write the yearly report as a PDF
    Export {
        #[arg(value_parser = year_parser())]
        year: Option<i32>,
        /// Output file (default: attendance-report-YYYY.pdf in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

enum Mark {
    Working,
    Holiday,
    Unmarked,
}

fn year_parser() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.data_dir).context("failed to load configuration")?;
    let _log_guard = logging::init(&config.log_dir);
    tracing::info!(data_dir = ?config.data_dir, "attendance starting");

    let service = AttendanceService::new(FileAttendanceRepository::new(&config.data_dir));
    let current_year = Local::now().year();

    match cli.command {
        Some(Commands::Mark { date }) => apply_mark(&service, &date, Mark::Working)?,
        Some(Commands::Holiday { date }) => apply_mark(&service, &date, Mark::Holiday)?,
        Some(Commands::Unmark { date }) => apply_mark(&service, &date, Mark::Unmarked)?,
        Some(Commands::Clear { month }) => {
            let month: MonthKey = month.parse()?;
            service.clear_month(month)?;
            println!("Cleared attendance for {}.", month);
        }
        Some(Commands::Stats { month }) => {
            let month = match month {
                Some(m) => m.parse()?,
                None => MonthKey::current(),
            };
            let selection = service.load_month(month)?;
            let stats = MonthlyStats::compute(month, &selection);
            report::show_month(month, &selection, &stats);
        }
        Some(Commands::Report { year }) => {
            let summary = YearlyReportUseCase::new(&service)
                .get_yearly_summary(year.unwrap_or(current_year))?;
            report::show_report(&ReportDto::from_summary(&summary));
        }
        Some(Commands::Export { year, output }) => {
            let summary = YearlyReportUseCase::new(&service)
                .get_yearly_summary(year.unwrap_or(current_year))?;
            let report = ReportDto::from_summary(&summary);
            let path = output.unwrap_or_else(|| PathBuf::from(report.file_name()));
            let bytes = render_pdf(&report, Local::now().date_naive())?;
            std::fs::write(&path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        Some(Commands::Tui) | None => {
            tui::run(&service, &config)?;
        }
    }

    tracing::info!("attendance exiting");
    Ok(())
}

fn apply_mark(
    service: &AttendanceService<FileAttendanceRepository>,
    input: &str,
    mark: Mark,
) -> Result<()> {
    let date: NaiveDate = parse_date(input)?;
    if is_weekend(date) {
        println!("Error: {} is a weekend; weekends are never counted.", format_date(date));
        return Ok(());
    }

    let month = MonthKey::from_date(date);
    let mut selection = service.load_month(month)?;
    match mark {
        Mark::Working => selection.mark_working(date),
        Mark::Holiday => selection.mark_holiday(date),
        Mark::Unmarked => {
            if !selection.unmark(date) {
                println!("{} has no mark.", format_date(date));
                return Ok(());
            }
        }
    }

    match service.save_month(month, &selection)? {
        SaveOutcome::Saved(record) => println!(
            "Saved {}: {} working, {} holiday, attendance {}%",
            month,
            record.working_days.len(),
            record.holidays.len(),
            record.attendance_percentage
        ),
        SaveOutcome::Deleted => println!("{} has no marks left; record removed.", month),
    }
    println!("{}", MonthlyStats::compute(month, &selection).remaining_message());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_year_must_fit_a_month_key() {
        assert!(Cli::try_parse_from(["attendance", "report", "2025"]).is_ok());
        assert!(Cli::try_parse_from(["attendance", "report", "300000"]).is_err());
        assert!(Cli::try_parse_from(["attendance", "export", "-1"]).is_err());
    }
}
