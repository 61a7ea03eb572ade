use std::sync::mpsc::Receiver;

use crate::calendar::MonthKey;
use crate::error::Result;
use crate::model::record::MonthlyRecord;
use crate::model::selection::Selection;
use crate::model::stats::MonthlyStats;
use crate::notify::{AttendanceUpdated, UpdateNotifier};
use crate::repository::AttendanceRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(MonthlyRecord),
    /// The month had no marks left, so its record was removed.
    Deleted,
}

pub struct AttendanceService<R: AttendanceRepository> {
    repo: R,
    notifier: UpdateNotifier,
}

impl<R: AttendanceRepository> AttendanceService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            notifier: UpdateNotifier::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> &R {
        &self.repo
    }

    pub fn subscribe(&self) -> Receiver<AttendanceUpdated> {
        self.notifier.subscribe()
    }

    pub fn load_month(&self, month: MonthKey) -> Result<Selection> {
        let record = self.repo.get(month).inspect_err(|err| {
            tracing::error!(%month, error = %err, "failed to load attendance");
        })?;
        Ok(record.map(|r| Selection::from_record(&r)).unwrap_or_default())
    }

    pub fn get_record(&self, month: MonthKey) -> Result<Option<MonthlyRecord>> {
        self.repo.get(month)
    }

    /// Persists the month's slice of `selection`. A month with no marks is
    /// deleted instead of stored empty.
    pub fn save_month(&self, month: MonthKey, selection: &Selection) -> Result<SaveOutcome> {
        let outcome = if selection.has_marks_in(month) {
            let stats = MonthlyStats::compute(month, selection);
            let record = selection.to_record(month, stats.attendance_percentage);
            self.repo.upsert(record.clone())
                .map(|_| SaveOutcome::Saved(record))
        } else {
            self.repo.delete(month).map(|_| SaveOutcome::Deleted)
        };

        match outcome {
            Ok(outcome) => {
                self.notifier.notify();
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(%month, error = %err, "failed to save attendance");
                Err(err)
            }
        }
    }

    pub fn clear_month(&self, month: MonthKey) -> Result<()> {
        self.repo.delete(month).inspect_err(|err| {
            tracing::error!(%month, error = %err, "failed to clear attendance");
        })?;
        self.notifier.notify();
        Ok(())
    }

    pub fn records(&self) -> Result<Vec<MonthlyRecord>> {
        self.repo.list().inspect_err(|err| {
            tracing::error!(error = %err, "failed to list attendance records");
        })
    }
}
