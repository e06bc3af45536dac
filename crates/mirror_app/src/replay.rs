//! A [`Crawler`] that plays back recorded crawler output.
//!
//! The recording is JSON lines: each line is either a crawl event as the
//! engine emits it, or `{"fatal": "<message>"}`.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mirror_core::{CrawlEvent, EventKind, MirrorConfig};
use mirror_logging::{mirror_debug, mirror_info};
use serde::Deserialize;

use crate::{AppError, Crawler, CrawlerSink};

const UNFINISHED_RECORDING: &str = "recording ended before the crawl completed";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReplayLine {
    Fatal { fatal: String },
    Event(CrawlEvent),
}

pub struct ReplayCrawler {
    lines: Arc<Vec<ReplayLine>>,
    delay: Duration,
    stop: Arc<AtomicBool>,
}

impl ReplayCrawler {
    pub fn new(lines: Vec<ReplayLine>) -> Self {
        Self {
            lines: Arc::new(lines),
            delay: Duration::ZERO,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::new(parse_recording(path, &content)?))
    }

    /// Pause between lines, to watch progress at a human pace.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Crawler for ReplayCrawler {
    fn start(&mut self, config: MirrorConfig, sink: CrawlerSink) {
        mirror_info!(
            "Replaying {} recorded lines for {}",
            self.lines.len(),
            config.url()
        );
        // Each run gets its own flag so a stop cannot leak into the next run.
        self.stop = Arc::new(AtomicBool::new(false));
        let stop = self.stop.clone();
        let lines = self.lines.clone();
        let delay = self.delay;

        thread::spawn(move || {
            for line in lines.iter() {
                if stop.load(Ordering::Relaxed) {
                    mirror_debug!("Replay stopped");
                    return;
                }
                match line {
                    ReplayLine::Fatal { fatal } => {
                        sink.fatal(fatal.clone());
                        return;
                    }
                    ReplayLine::Event(event) => {
                        sink.emit(event.clone());
                        if event.kind == EventKind::Complete {
                            return;
                        }
                    }
                }
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
            if !stop.load(Ordering::Relaxed) {
                sink.fatal(UNFINISHED_RECORDING);
            }
        });
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Parses a JSON-lines recording; blank lines are skipped.
pub fn parse_recording(path: &Path, content: &str) -> Result<Vec<ReplayLine>, AppError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| AppError::Replay {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_mixes_events_and_fatal_lines() {
        let content = r#"{"type":"start","url":"https://example.com","downloaded":0,"errors":0}

{"type":"download","url":"https://example.com/a.css","filePath":"a.css","downloaded":1,"errors":0,"message":""}
{"fatal":"disk full"}
"#;
        let lines = parse_recording(Path::new("rec.jsonl"), content).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(matches!(&lines[0], ReplayLine::Event(e) if e.kind == EventKind::Start));
        assert_eq!(
            lines[2],
            ReplayLine::Fatal {
                fatal: "disk full".into()
            }
        );
    }

    #[test]
    fn bad_line_reports_its_number() {
        let content = "{\"fatal\":\"x\"}\nnot json\n";
        match parse_recording(Path::new("rec.jsonl"), content) {
            Err(AppError::Replay { line, .. }) => assert_eq!(line, 2),
            Err(other) => panic!("unexpected error {other}"),
            Ok(lines) => panic!("unexpected success {lines:?}"),
        }
    }
}
