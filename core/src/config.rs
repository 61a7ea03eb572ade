use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AttendanceError, Result};
use crate::usecase::editor::EditorTimings;

pub const DATA_DIR_ENV: &str = "ATTENDANCE_DATA_DIR";
pub const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_DIR_NAME: &str = ".attendance";

/// Optional overrides read from `config.toml` in the data directory.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
struct FileSettings {
    debounce_ms: u64,
    double_click_ms: u64,
    saved_indicator_ms: u64,
    log_dir: Option<PathBuf>,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            double_click_ms: 300,
            saved_indicator_ms: 2000,
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub debounce_ms: u64,
    pub double_click_ms: u64,
    pub saved_indicator_ms: u64,
    pub log_dir: PathBuf,
}

impl Config {
    /// Resolves the data directory (explicit override, then
    /// `ATTENDANCE_DATA_DIR`, then `~/.attendance`) and reads its config
    /// file if one exists.
    pub fn load(data_dir_override: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir_override {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Self::load_from(&data_dir)
    }

    pub fn load_from(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let settings = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|source| AttendanceError::ReadFailure {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&text).map_err(|source| AttendanceError::InvalidConfig {
                path: path.clone(),
                source,
            })?
        } else {
            FileSettings::default()
        };

        let log_dir = match settings.log_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => data_dir.join(dir),
            None => data_dir.join("logs"),
        };

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            debounce_ms: settings.debounce_ms,
            double_click_ms: settings.double_click_ms,
            saved_indicator_ms: settings.saved_indicator_ms,
            log_dir,
        })
    }

    pub fn editor_timings(&self) -> EditorTimings {
        EditorTimings {
            debounce: Duration::from_millis(self.debounce_ms),
            double_click: Duration::from_millis(self.double_click_ms),
            saved_indicator: Duration::from_millis(self.saved_indicator_ms),
        }
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home_dir = dirs::home_dir().ok_or(AttendanceError::NoHomeDir)?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}
