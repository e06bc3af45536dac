//! Read-only projections that gate user actions. Always computed from the
//! current values, never stored.

use crate::{MirrorConfig, SessionStatus};

pub fn can_start(config: &MirrorConfig, status: SessionStatus) -> bool {
    config.is_usable() && !is_downloading(status)
}

pub fn is_downloading(status: SessionStatus) -> bool {
    status == SessionStatus::Downloading
}
