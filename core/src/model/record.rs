use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calendar::MonthKey;

/// One persisted month of attendance marks, keyed by `month`.
///
/// `attendance_percentage` is a cached value; the day sets are authoritative.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub month: MonthKey,
    #[serde(default)]
    pub working_days: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub attendance_percentage: u32,
    /// Fields written by newer versions, kept so a rewrite does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MonthlyRecord {
    /// Placeholder for a month with nothing stored.
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            working_days: BTreeSet::new(),
            holidays: BTreeSet::new(),
            attendance_percentage: 0,
            extra: Map::new(),
        }
    }

    /// Drops any date that does not belong to `self.month`.
    pub fn retain_month(&mut self) {
        let month = self.month;
        self.working_days.retain(|d| month.contains(*d));
        self.holidays.retain(|d| month.contains(*d));
    }

    /// Copies over unknown fields of `previous` that this record lacks.
    pub fn inherit_extra(&mut self, previous: &MonthlyRecord) {
        for (key, value) in &previous.extra {
            self.extra.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.working_days.is_empty() && self.holidays.is_empty()
    }
}
