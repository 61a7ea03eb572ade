use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::calendar::MonthKey;

#[derive(Debug, Clone)]
struct PendingSave<T> {
    due: Instant,
    payload: T,
}

/// Debounced save handles, at most one per month.
///
/// Scheduling a month again replaces its pending save and pushes the
/// deadline back. Saves for other months are left alone.
#[derive(Debug, Clone)]
pub struct SaveScheduler<T> {
    delay: Duration,
    pending: BTreeMap<MonthKey, PendingSave<T>>,
}

impl<T> SaveScheduler<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: BTreeMap::new(),
        }
    }

    pub fn schedule(&mut self, month: MonthKey, payload: T, now: Instant) {
        let due = now + self.delay;
        self.pending.insert(month, PendingSave { due, payload });
    }

    /// Drops the pending save for `month`, returning whether there was one.
    pub fn cancel(&mut self, month: MonthKey) -> bool {
        self.pending.remove(&month).is_some()
    }

    /// Removes the pending save for `month` regardless of its deadline.
    pub fn take(&mut self, month: MonthKey) -> Option<T> {
        self.pending.remove(&month).map(|p| p.payload)
    }

    /// Removes and returns every save whose deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Vec<(MonthKey, T)> {
        let due: Vec<MonthKey> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(m, _)| *m)
            .collect();
        due.into_iter()
            .filter_map(|m| self.pending.remove(&m).map(|p| (m, p.payload)))
            .collect()
    }

    pub fn drain(&mut self) -> Vec<(MonthKey, T)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(m, p)| (m, p.payload))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_reschedule_replaces_and_delays() {
        let start = Instant::now();
        let mut scheduler = SaveScheduler::new(DELAY);
        scheduler.schedule(month("2025-06"), 1, start);
        scheduler.schedule(month("2025-06"), 2, start + Duration::from_millis(200));

        assert!(scheduler.take_due(start + Duration::from_millis(300)).is_empty());

        let fired = scheduler.take_due(start + Duration::from_millis(500));
        assert_eq!(fired, vec![(month("2025-06"), 2)]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_other_months_are_not_cancelled() {
        let start = Instant::now();
        let mut scheduler = SaveScheduler::new(DELAY);
        scheduler.schedule(month("2025-06"), "june", start);
        scheduler.schedule(month("2025-07"), "july", start + Duration::from_millis(100));

        assert!(scheduler.cancel(month("2025-07")));
        assert!(!scheduler.cancel(month("2025-07")));
        assert_eq!(scheduler.next_deadline(), Some(start + DELAY));
        assert_eq!(scheduler.take(month("2025-06")), Some("june"));
    }

    #[test]
    fn test_take_ignores_deadline() {
        let start = Instant::now();
        let mut scheduler = SaveScheduler::new(DELAY);
        scheduler.schedule(month("2025-06"), 7, start);

        assert_eq!(scheduler.take(month("2025-06")), Some(7));
        assert_eq!(scheduler.take(month("2025-06")), None);
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_drain_returns_everything() {
        let start = Instant::now();
        let mut scheduler = SaveScheduler::new(DELAY);
        scheduler.schedule(month("2025-07"), 2, start);
        scheduler.schedule(month("2025-06"), 1, start);

        assert_eq!(
            scheduler.drain(),
            vec![(month("2025-06"), 1), (month("2025-07"), 2)]
        );
        assert!(scheduler.is_empty());
    }
}
