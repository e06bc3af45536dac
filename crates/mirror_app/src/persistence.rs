use mirror_core::{HistoryEntry, Msg, Preset, Settings};
use mirror_logging::{mirror_error, mirror_info, mirror_warn};
use mirror_store::JsonStore;

/// Messages that restore every persisted record. A record that cannot be
/// read is skipped with a warning so a damaged file never blocks startup.
pub(crate) fn restore_messages(store: &JsonStore) -> Vec<Msg> {
    let mut msgs = Vec::with_capacity(3);

    match store.load_settings() {
        Ok(settings) => msgs.push(Msg::RestoreSettings(settings)),
        Err(err) => mirror_warn!("Failed to load settings from {:?}: {}", store.dir(), err),
    }
    match store.load_presets() {
        Ok(presets) => msgs.push(Msg::RestorePresets(presets)),
        Err(err) => mirror_warn!("Failed to load presets from {:?}: {}", store.dir(), err),
    }
    match store.load_history() {
        Ok(entries) => {
            mirror_info!("Loaded {} history entries", entries.len());
            msgs.push(Msg::RestoreHistory(entries));
        }
        Err(err) => mirror_warn!("Failed to load history from {:?}: {}", store.dir(), err),
    }

    msgs
}

pub(crate) fn save_history(store: &JsonStore, entries: &[HistoryEntry]) {
    if let Err(err) = store.save_history(entries) {
        mirror_error!("Failed to write history to {:?}: {}", store.dir(), err);
    }
}

pub(crate) fn save_presets(store: &JsonStore, presets: &[Preset]) {
    if let Err(err) = store.save_presets(presets) {
        mirror_error!("Failed to write presets to {:?}: {}", store.dir(), err);
    }
}

pub(crate) fn save_settings(store: &JsonStore, settings: &Settings) {
    if let Err(err) = store.save_settings(settings) {
        mirror_error!("Failed to write settings to {:?}: {}", store.dir(), err);
    }
}
