use std::fmt;

use mirror_logging::{mirror_info, mirror_trace};
use serde::{Deserialize, Serialize};

use crate::guard::can_start;
use crate::{
    CrawlEvent, EventKind, HistoryEntry, HistoryId, LogEntry, MirrorConfig, SessionError,
    Severity, Timestamp,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Downloading,
    Completed,
    Error,
    Stopped,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Stopped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Downloading => "downloading",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The statuses a session can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStatus {
    Completed,
    Error,
    Stopped,
}

impl From<TerminalStatus> for SessionStatus {
    fn from(status: TerminalStatus) -> Self {
        match status {
            TerminalStatus::Completed => Self::Completed,
            TerminalStatus::Error => Self::Error,
            TerminalStatus::Stopped => Self::Stopped,
        }
    }
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(SessionStatus::from(*self).as_str())
    }
}

/// Config frozen at `start()` plus the start instant.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveRun {
    config: MirrorConfig,
    started_at: Timestamp,
}

/// Lifecycle status, live counters and activity log of the one crawl this
/// process runs at a time.
///
/// All mutation goes through the transition methods; each one either
/// applies completely or returns an error and leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    status: SessionStatus,
    downloaded_count: u64,
    error_count: u64,
    current_url: String,
    log: Vec<LogEntry>,
    run: Option<ActiveRun>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a crawl of `config`, which is copied so later edits cannot
    /// reach this session.
    pub fn start(&mut self, config: &MirrorConfig, now: Timestamp) -> Result<(), SessionError> {
        if self.status == SessionStatus::Downloading {
            return Err(SessionError::AlreadyDownloading);
        }
        if !can_start(config, self.status) {
            return Err(SessionError::ConfigUnusable);
        }

        self.clear_progress();
        self.current_url = config.url().to_owned();
        self.status = SessionStatus::Downloading;
        self.run = Some(ActiveRun {
            config: config.clone(),
            started_at: now,
        });
        mirror_info!(
            "Session started url={} output={} concurrency={}",
            config.url(),
            config.output_path(),
            config.concurrency()
        );
        Ok(())
    }

    /// Applies one crawler event. Counters are replaced by the event's
    /// totals and exactly one log line is appended. A `complete` event
    /// also ends the session and yields its history entry.
    pub fn apply_event(
        &mut self,
        event: CrawlEvent,
        now: Timestamp,
    ) -> Result<Option<HistoryEntry>, SessionError> {
        self.ensure_downloading()?;
        mirror_trace!(
            "Crawl event kind={:?} downloaded={} errors={} url={}",
            event.kind,
            event.downloaded_so_far,
            event.errors_so_far,
            event.url
        );

        self.downloaded_count = event.downloaded_so_far;
        self.error_count = event.errors_so_far;
        if !event.url.is_empty() {
            self.current_url.clone_from(&event.url);
        }
        self.log.push(LogEntry::from_event(&event, now));

        if event.kind == EventKind::Complete {
            return self.finish(TerminalStatus::Completed, now).map(Some);
        }
        Ok(None)
    }

    /// Records a user-requested stop. The crawler is told separately.
    pub fn stop(&mut self, now: Timestamp) -> Result<HistoryEntry, SessionError> {
        self.ensure_terminable()?;
        self.log.push(LogEntry::new(
            Severity::Warning,
            "Stopped by user",
            None,
            now,
        ));
        self.finish(TerminalStatus::Stopped, now)
    }

    /// Records that the crawler reported it cannot continue.
    pub fn fail(&mut self, message: &str, now: Timestamp) -> Result<HistoryEntry, SessionError> {
        self.ensure_terminable()?;
        self.log.push(LogEntry::new(
            Severity::Error,
            format!("Crawl failed: {message}"),
            None,
            now,
        ));
        self.finish(TerminalStatus::Error, now)
    }

    /// Returns to idle with zeroed counters and an empty log.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Downloading {
            return Err(SessionError::ResetWhileDownloading);
        }
        self.clear_progress();
        self.status = SessionStatus::Idle;
        Ok(())
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn downloaded_count(&self) -> u64 {
        self.downloaded_count
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// The config frozen by the running session, if any.
    pub fn frozen_config(&self) -> Option<&MirrorConfig> {
        self.run.as_ref().map(|run| &run.config)
    }

    fn ensure_downloading(&self) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Downloading => Ok(()),
            status => Err(SessionError::NotDownloading { status }),
        }
    }

    // Ending a session that never started is reported apart from ending
    // one twice.
    fn ensure_terminable(&self) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Idle => Err(SessionError::NotStarted),
            _ => self.ensure_downloading(),
        }
    }

    fn finish(
        &mut self,
        terminal: TerminalStatus,
        now: Timestamp,
    ) -> Result<HistoryEntry, SessionError> {
        let run = self.run.take().ok_or(SessionError::NotStarted)?;
        self.status = terminal.into();
        mirror_info!(
            "Session {} url={} downloaded={} errors={}",
            terminal,
            run.config.url(),
            self.downloaded_count,
            self.error_count
        );

        Ok(HistoryEntry {
            id: HistoryId::new(),
            url: run.config.url().to_owned(),
            domain: run.config.domain().to_owned(),
            output_path: run.config.output_path().to_owned(),
            started_at: run.started_at,
            completed_at: Some(now),
            downloaded_count: self.downloaded_count,
            error_count: self.error_count,
            terminal_status: terminal,
            config: run.config,
        })
    }

    fn clear_progress(&mut self) {
        self.downloaded_count = 0;
        self.error_count = 0;
        self.current_url.clear();
        self.log.clear();
    }
}
