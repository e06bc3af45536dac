use crate::guard;
use crate::view_model::AppViewModel;
use crate::{
    Clock, HistoryLog, MirrorConfig, PresetBook, SessionError, SessionState, Settings, Theme,
};

/// Everything the core owns: the live config, the one session, and the
/// history, presets and settings that outlive it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) config: MirrorConfig,
    pub(crate) session: SessionState,
    pub(crate) history: HistoryLog,
    pub(crate) presets: PresetBook,
    pub(crate) settings: Settings,
    pub(crate) clock: Clock,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    /// One consistent snapshot of everything the UI shows.
    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            config: self.config.clone(),
            status: self.session.status(),
            downloaded_count: self.session.downloaded_count(),
            error_count: self.session.error_count(),
            current_url: self.session.current_url().to_owned(),
            log: self.session.log().to_vec(),
            can_start: self.can_start(),
            is_downloading: self.is_downloading(),
            history: self.history.newest_first().cloned().collect(),
            presets: self.presets.list().to_vec(),
            settings: self.settings.clone(),
            theme: self.theme(),
            dirty: self.dirty,
        }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn presets(&self) -> &PresetBook {
        &self.presets
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Derived from the settings on every read, so it can never lag a write.
    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    pub fn can_start(&self) -> bool {
        guard::can_start(&self.config, self.session.status())
    }

    pub fn is_downloading(&self) -> bool {
        guard::is_downloading(self.session.status())
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The live config may only change while no session is running.
    pub(crate) fn config_mut(&mut self) -> Result<&mut MirrorConfig, SessionError> {
        if self.is_downloading() {
            return Err(SessionError::ConfigLocked);
        }
        Ok(&mut self.config)
    }
}
