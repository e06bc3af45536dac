use crate::{ConfigPatch, CrawlEvent, HistoryEntry, HistoryId, Preset, PresetId, Settings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited one or more config fields.
    ConfigEdited(ConfigPatch),
    /// User clicked Start.
    StartClicked,
    /// User clicked Stop.
    StopClicked,
    /// User cleared the finished session back to idle.
    ResetClicked,
    /// Progress from the crawler, in arrival order.
    Crawl(CrawlEvent),
    /// The crawler reported it cannot continue.
    CrawlFatal { message: String },
    /// User saved the current config as a preset.
    PresetCreated { name: String },
    PresetDeleted(PresetId),
    /// User loaded a preset into the config form.
    PresetApplied(PresetId),
    HistoryCleared,
    /// User loaded a past session's config into the config form.
    HistoryRerun(HistoryId),
    SettingsSaved(Settings),
    /// Restore persisted records at startup.
    RestoreHistory(Vec<HistoryEntry>),
    RestorePresets(Vec<Preset>),
    RestoreSettings(Settings),
}
