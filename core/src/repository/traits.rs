use crate::calendar::MonthKey;
use crate::error::Result;
use crate::model::record::MonthlyRecord;

/// Durable storage for monthly attendance records, keyed by month.
pub trait AttendanceRepository {
    /// Inserts or replaces the record for `record.month`. Dates outside the
    /// month are dropped before writing.
    fn upsert(&self, record: MonthlyRecord) -> Result<()>;
    fn get(&self, month: MonthKey) -> Result<Option<MonthlyRecord>>;
    /// Deleting a month that has no record is not an error.
    fn delete(&self, month: MonthKey) -> Result<()>;
    /// Every stored record, in no particular order.
    fn list(&self) -> Result<Vec<MonthlyRecord>>;
}
