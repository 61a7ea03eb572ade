use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::calendar::{is_weekend, MonthKey};
use crate::model::selection::Selection;
use crate::model::stats::MonthlyStats;
use crate::repository::AttendanceRepository;
use crate::service::attendance_service::AttendanceService;
use crate::usecase::scheduler::SaveScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorTimings {
    pub debounce: Duration,
    pub double_click: Duration,
    pub saved_indicator: Duration,
}

impl Default for EditorTimings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            double_click: Duration::from_millis(300),
            saved_indicator: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
}

/// Month editing session: the current month, its marks, and the debounced
/// persistence of those marks.
///
/// All timing comes in through `now` arguments; the caller drives `tick`.
pub struct MonthEditor<'a, R: AttendanceRepository> {
    service: &'a AttendanceService<R>,
    month: MonthKey,
    selection: Selection,
    last_click: HashMap<NaiveDate, Instant>,
    scheduler: SaveScheduler<Selection>,
    status: SaveStatus,
    saved_until: Option<Instant>,
    timings: EditorTimings,
}

impl<'a, R: AttendanceRepository> MonthEditor<'a, R> {
    pub fn new(service: &'a AttendanceService<R>, month: MonthKey, timings: EditorTimings) -> Self {
        let selection = load_or_empty(service, month);
        Self {
            service,
            month,
            selection,
            last_click: HashMap::new(),
            scheduler: SaveScheduler::new(timings.debounce),
            status: SaveStatus::Idle,
            saved_until: None,
            timings,
        }
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn stats(&self) -> MonthlyStats {
        MonthlyStats::compute(self.month, &self.selection)
    }

    pub fn has_pending_save(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.scheduler.next_deadline(), self.saved_until]
            .into_iter()
            .flatten()
            .min()
    }

    /// A click on a calendar day. Weekends and days outside the current month
    /// are ignored. A second click on the same day inside the double-click
    /// window toggles it as a holiday instead.
    ///
    /// Returns whether the selection changed.
    pub fn click(&mut self, date: NaiveDate, now: Instant) -> bool {
        if is_weekend(date) || !self.month.contains(date) {
            return false;
        }

        let double = self
            .last_click
            .get(&date)
            .is_some_and(|last| now.saturating_duration_since(*last) < self.timings.double_click);

        if double {
            self.selection.toggle_holiday(date);
            self.last_click.remove(&date);
        } else {
            self.selection.toggle_working(date);
            self.last_click.insert(date, now);
        }
        self.schedule_save(now);
        true
    }

    /// Toggles a holiday directly, without the double-click gesture.
    pub fn toggle_holiday(&mut self, date: NaiveDate, now: Instant) -> bool {
        if is_weekend(date) || !self.month.contains(date) {
            return false;
        }
        self.selection.toggle_holiday(date);
        self.last_click.remove(&date);
        self.schedule_save(now);
        true
    }

    /// Empties the month and deletes its record right away.
    pub fn clear(&mut self, now: Instant) {
        self.selection.clear();
        self.last_click.clear();
        self.scheduler.cancel(self.month);
        match self.service.clear_month(self.month) {
            Ok(()) => self.mark_saved(now),
            Err(_) => self.mark_idle(),
        }
    }

    /// Switches months. A save still pending for the month being left is
    /// written first so quick navigation never drops edits.
    pub fn navigate_to(&mut self, month: MonthKey, now: Instant) {
        if month == self.month {
            return;
        }
        if let Some(pending) = self.scheduler.take(self.month) {
            self.persist(self.month, &pending, now);
        }
        tracing::debug!(from = %self.month, to = %month, "navigating");
        self.month = month;
        self.selection = load_or_empty(self.service, month);
        self.last_click.clear();
    }

    pub fn next_month(&mut self, now: Instant) {
        self.navigate_to(self.month.succ(), now);
    }

    pub fn prev_month(&mut self, now: Instant) {
        self.navigate_to(self.month.pred(), now);
    }

    /// Runs due saves and expires the "saved" indicator.
    pub fn tick(&mut self, now: Instant) {
        for (month, selection) in self.scheduler.take_due(now) {
            self.persist(month, &selection, now);
        }
        if self.status == SaveStatus::Saved && self.saved_until.is_some_and(|t| t <= now) {
            self.mark_idle();
        }
    }

    /// Writes every pending save immediately, e.g. before exiting.
    pub fn flush(&mut self, now: Instant) {
        for (month, selection) in self.scheduler.drain() {
            self.persist(month, &selection, now);
        }
    }

    fn schedule_save(&mut self, now: Instant) {
        self.scheduler.schedule(self.month, self.selection.clone(), now);
        self.status = SaveStatus::Saving;
        self.saved_until = None;
    }

    fn persist(&mut self, month: MonthKey, selection: &Selection, now: Instant) {
        match self.service.save_month(month, selection) {
            Ok(_) => self.mark_saved(now),
            // Already logged by the service; the edit stays in memory.
            Err(_) => self.mark_idle(),
        }
    }

    fn mark_saved(&mut self, now: Instant) {
        if self.scheduler.is_empty() {
            self.status = SaveStatus::Saved;
            self.saved_until = Some(now + self.timings.saved_indicator);
        }
    }

    fn mark_idle(&mut self) {
        self.status = if self.scheduler.is_empty() {
            SaveStatus::Idle
        } else {
            SaveStatus::Saving
        };
        self.saved_until = None;
    }
}

fn load_or_empty<R: AttendanceRepository>(service: &AttendanceService<R>, month: MonthKey) -> Selection {
    service.load_month(month).unwrap_or_default()
}
