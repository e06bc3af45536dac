use serde::{Deserialize, Serialize};

use crate::{LogId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Start,
    Download,
    /// A single url failed; the crawl carries on.
    Error,
    Complete,
}

/// Progress notification emitted by the crawler.
///
/// The counters are running totals as seen by the crawler, not deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(rename = "downloaded")]
    pub downloaded_so_far: u64,
    #[serde(rename = "errors")]
    pub errors_so_far: u64,
    #[serde(default)]
    pub message: String,
}

impl CrawlEvent {
    pub fn new(kind: EventKind, downloaded_so_far: u64, errors_so_far: u64) -> Self {
        Self {
            kind,
            url: String::new(),
            file_path: String::new(),
            downloaded_so_far,
            errors_so_far,
            message: String::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
    Warning,
}

/// One line of the session activity log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    id: LogId,
    timestamp: Timestamp,
    #[serde(rename = "type")]
    severity: Severity,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl LogEntry {
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        url: Option<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: LogId::new(),
            timestamp,
            severity,
            message: message.into(),
            url,
        }
    }

    /// Maps a crawler event to the log line shown for it.
    pub fn from_event(event: &CrawlEvent, timestamp: Timestamp) -> Self {
        let severity = match event.kind {
            EventKind::Start => Severity::Info,
            EventKind::Download | EventKind::Complete => Severity::Success,
            EventKind::Error => Severity::Error,
        };
        let message = if event.message.is_empty() {
            default_message(event)
        } else {
            event.message.clone()
        };
        let url = (!event.url.is_empty()).then(|| event.url.clone());
        Self::new(severity, message, url, timestamp)
    }

    pub fn id(&self) -> LogId {
        self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

fn default_message(event: &CrawlEvent) -> String {
    match event.kind {
        EventKind::Start => format!("Started mirroring {}", event.url),
        EventKind::Download if !event.file_path.is_empty() => {
            format!("Saved {}", event.file_path)
        }
        EventKind::Download => format!("Downloaded {}", event.url),
        EventKind::Error => format!("Failed to fetch {}", event.url),
        EventKind::Complete => format!(
            "Finished: {} downloaded, {} errors",
            event.downloaded_so_far, event.errors_so_far
        ),
    }
}
