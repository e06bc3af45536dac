use crate::{HistoryEntry, LogEntry, MirrorConfig, Preset, SessionStatus, Settings, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub config: MirrorConfig,
    pub status: SessionStatus,
    pub downloaded_count: u64,
    pub error_count: u64,
    pub current_url: String,
    pub log: Vec<LogEntry>,
    pub can_start: bool,
    pub is_downloading: bool,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
    pub presets: Vec<Preset>,
    pub settings: Settings,
    pub theme: Theme,
    pub dirty: bool,
}
