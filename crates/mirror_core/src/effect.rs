use crate::{CoreError, HistoryEntry, MirrorConfig, Preset, Settings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the frozen config to the crawler.
    StartCrawl { config: MirrorConfig },
    /// Ask the crawler to wind down; cooperative.
    StopCrawl,
    /// Full history, oldest first.
    PersistHistory(Vec<HistoryEntry>),
    PersistPresets(Vec<Preset>),
    PersistSettings(Settings),
    Notify { summary: String },
    /// The message was refused; nothing changed.
    Rejected(CoreError),
}
