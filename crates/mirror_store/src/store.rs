use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mirror_core::{HistoryEntry, Preset, Settings};
use mirror_logging::{mirror_debug, mirror_info};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{AtomicFileWriter, StoreError};

pub const HISTORY_FILENAME: &str = "history.json";
pub const PRESETS_FILENAME: &str = "presets.json";
pub const SETTINGS_FILENAME: &str = "settings.json";

const APP_DIR_NAME: &str = "sitemirror";

/// Per-user directory holding the store files, e.g. `~/.config/sitemirror`.
pub fn default_store_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// JSON files for history, presets and settings in one directory.
///
/// A missing file reads as empty (or default settings); each save rewrites
/// the whole file atomically.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
    writer: AtomicFileWriter,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            writer: AtomicFileWriter::new(dir.clone()),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// History entries, oldest first.
    pub fn load_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.load(HISTORY_FILENAME)?.unwrap_or_default())
    }

    pub fn save_history(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        self.save(HISTORY_FILENAME, entries)
    }

    pub fn load_presets(&self) -> Result<Vec<Preset>, StoreError> {
        Ok(self.load(PRESETS_FILENAME)?.unwrap_or_default())
    }

    pub fn save_presets(&self, presets: &[Preset]) -> Result<(), StoreError> {
        self.save(PRESETS_FILENAME, presets)
    }

    pub fn load_settings(&self) -> Result<Settings, StoreError> {
        Ok(self.load(SETTINGS_FILENAME)?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.save(SETTINGS_FILENAME, settings)
    }

    fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>, StoreError> {
        let path = self.dir.join(filename);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                mirror_debug!("No store file at {:?}", path);
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let value = serde_json::from_str(&content)
            .map_err(|source| StoreError::Json { path: path.clone(), source })?;
        mirror_info!("Loaded {:?}", path);
        Ok(Some(value))
    }

    fn save<T: Serialize + ?Sized>(&self, filename: &str, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: self.dir.join(filename),
            source,
        })?;
        let path = self.writer.write(filename, &content)?;
        mirror_debug!("Wrote {:?}", path);
        Ok(())
    }
}
