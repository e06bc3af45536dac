//! Mirror store: JSON persistence for history, presets and settings.
mod persist;
mod store;

pub use persist::{ensure_dir, AtomicFileWriter, StoreError};
pub use store::{
    default_store_dir, JsonStore, HISTORY_FILENAME, PRESETS_FILENAME, SETTINGS_FILENAME,
};
