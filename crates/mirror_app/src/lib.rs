//! Mirror app: session controller, crawler seam and effect execution.
mod controller;
mod crawler;
mod effects;
mod error;
mod persistence;
mod replay;

pub use controller::{SessionController, StateReader};
pub use crawler::{Crawler, CrawlerSink};
pub use effects::{EffectRunner, Notifier};
pub use error::AppError;
pub use replay::{parse_recording, ReplayCrawler, ReplayLine};
