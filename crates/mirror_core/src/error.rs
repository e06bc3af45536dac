use thiserror::Error;

use crate::{HistoryId, PresetId, SessionStatus};

/// Misuse of the session lifecycle by the surrounding orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a crawl is already in progress")]
    AlreadyDownloading,
    #[error("configuration is not usable: url and output path are required")]
    ConfigUnusable,
    #[error("configuration cannot change while a crawl is in progress")]
    ConfigLocked,
    #[error("no crawl is in progress (status: {status})")]
    NotDownloading { status: SessionStatus },
    #[error("session terminated without a prior start")]
    NotStarted,
    #[error("cannot reset while a crawl is in progress")]
    ResetWhileDownloading,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be a positive integer")]
    NotPositive { field: &'static str },
    #[error("preset name must not be blank")]
    BlankPresetName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no preset with id {0}")]
    Preset(PresetId),
    #[error("no history entry with id {0}")]
    History(HistoryId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
