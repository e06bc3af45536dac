//! Mirror core: session state machine, derived guards and the records that
//! outlive a session. Pure; no I/O and no threads.
mod clock;
mod config;
mod effect;
mod error;
mod event;
mod guard;
mod history;
mod id;
mod msg;
mod preset;
mod session;
mod settings;
mod state;
mod update;
mod view_model;

pub use clock::{Clock, Timestamp};
pub use config::{
    extract_domain, ConfigPatch, MirrorConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH,
    DEFAULT_RETRIES,
};
pub use effect::Effect;
pub use error::{CoreError, LookupError, SessionError, ValidationError};
pub use event::{CrawlEvent, EventKind, LogEntry, Severity};
pub use guard::{can_start, is_downloading};
pub use history::{HistoryEntry, HistoryLog, HISTORY_LIMIT};
pub use id::{HistoryId, LogId, PresetId};
pub use msg::Msg;
pub use preset::{Preset, PresetBook};
pub use session::{SessionState, SessionStatus, TerminalStatus};
pub use settings::{Settings, Theme};
pub use state::AppState;
pub use update::update;
pub use view_model::AppViewModel;
