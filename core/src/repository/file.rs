use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calendar::MonthKey;
use crate::error::{AttendanceError, Result};
use crate::model::record::MonthlyRecord;
use crate::repository::traits::AttendanceRepository;

pub const DEFAULT_FILE_NAME: &str = "attendance.json";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
    schema_version: u32,
    #[serde(default)]
    records: BTreeMap<MonthKey, MonthlyRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl StoreFile {
    // A store from a newer version keeps its version number.
    fn touch_version(&mut self) {
        self.schema_version = self.schema_version.max(SCHEMA_VERSION);
    }
}

// Version 0 stored a bare array of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Current(StoreFile),
    Legacy(Vec<MonthlyRecord>),
}

/// JSON-file attendance store: one document holding every month.
///
/// Nothing touches the disk until the first operation; that access creates
/// the directory and an empty store if they are missing.
#[derive(Clone, Debug)]
pub struct FileAttendanceRepository {
    file_path: PathBuf,
}

impl FileAttendanceRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            file_path: base_dir.into().join(DEFAULT_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn ensure_store(&self) -> Result<()> {
        if self.file_path.exists() {
            return Ok(());
        }
        let unavailable = |source| AttendanceError::StorageUnavailable {
            path: self.file_path.clone(),
            source,
        };
        if let Some(dir) = self.file_path.parent() {
            fs::create_dir_all(dir).map_err(unavailable)?;
        }
        let empty = StoreFile {
            schema_version: SCHEMA_VERSION,
            ..StoreFile::default()
        };
        self.write_store(&empty).map_err(unavailable)?;
        tracing::info!(path = ?self.file_path, "created attendance store");
        Ok(())
    }

    fn read_store(&self) -> Result<StoreFile> {
        self.ensure_store()?;
        let read_failure = |source| AttendanceError::ReadFailure {
            path: self.file_path.clone(),
            source,
        };
        let file = File::open(&self.file_path).map_err(read_failure)?;
        let on_disk: OnDisk = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| read_failure(io::Error::from(e)))?;

        match on_disk {
            OnDisk::Current(store) => {
                if store.schema_version > SCHEMA_VERSION {
                    tracing::warn!(
                        found = store.schema_version,
                        supported = SCHEMA_VERSION,
                        "attendance store was written by a newer version"
                    );
                }
                Ok(store)
            }
            OnDisk::Legacy(records) => self.migrate_legacy(records),
        }
    }

    fn migrate_legacy(&self, records: Vec<MonthlyRecord>) -> Result<StoreFile> {
        let store = StoreFile {
            schema_version: SCHEMA_VERSION,
            records: records.into_iter().map(|r| (r.month, r)).collect(),
            extra: Map::new(),
        };
        self.write_store(&store)
            .map_err(|source| AttendanceError::WriteFailure {
                path: self.file_path.clone(),
                source,
            })?;
        tracing::info!(records = store.records.len(), "migrated legacy attendance store");
        Ok(store)
    }

    // Writes a sibling temp file and renames it over the store.
    fn write_store(&self, store: &StoreFile) -> io::Result<()> {
        let tmp_path = self.file_path.with_extension("json.tmp");
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, store)?;
        writer.flush()?;
        fs::rename(&tmp_path, &self.file_path)
    }
}

impl AttendanceRepository for FileAttendanceRepository {
    fn upsert(&self, mut record: MonthlyRecord) -> Result<()> {
        record.retain_month();
        let month = record.month;
        let mut store = self.read_store()?;
        if let Some(previous) = store.records.get(&month) {
            record.inherit_extra(previous);
        }
        store.records.insert(month, record);
        store.touch_version();
        self.write_store(&store)
            .map_err(|source| AttendanceError::WriteFailure {
                path: self.file_path.clone(),
                source,
            })?;
        tracing::info!(%month, "saved attendance record");
        Ok(())
    }

    fn get(&self, month: MonthKey) -> Result<Option<MonthlyRecord>> {
        let mut store = self.read_store()?;
        let record = store.records.remove(&month);
        tracing::debug!(%month, found = record.is_some(), "loaded attendance record");
        Ok(record)
    }

    fn delete(&self, month: MonthKey) -> Result<()> {
        let mut store = self.read_store()?;
        if store.records.remove(&month).is_none() {
            return Ok(());
        }
        store.touch_version();
        self.write_store(&store)
            .map_err(|source| AttendanceError::DeleteFailure { month, source })?;
        tracing::info!(%month, "deleted attendance record");
        Ok(())
    }

    fn list(&self) -> Result<Vec<MonthlyRecord>> {
        let store = self.read_store()?;
        Ok(store.records.into_values().collect())
    }
}
