use std::sync::mpsc;

use mirror_core::{CrawlEvent, MirrorConfig, Msg};

/// The fetching engine, seen from the session core as a black box that
/// consumes one config and reports back through a [`CrawlerSink`].
///
/// Every crawl must end with either a `complete` event or a fatal signal,
/// unless it was stopped.
pub trait Crawler: Send {
    fn start(&mut self, config: MirrorConfig, sink: CrawlerSink);
    /// Cooperative; in-flight work may still report before winding down.
    fn stop(&mut self);
}

/// A crawler report tagged with the run that produced it.
#[derive(Debug)]
pub(crate) struct Inbound {
    pub(crate) run: u64,
    pub(crate) msg: Msg,
}

/// Channel handle the crawler reports through. Cheap to clone into every
/// worker; messages are applied in the order they arrive.
///
/// Each sink belongs to one run. Reports from a run that has since been
/// replaced by a new start are dropped by the controller.
#[derive(Debug, Clone)]
pub struct CrawlerSink {
    run: u64,
    tx: mpsc::Sender<Inbound>,
}

impl CrawlerSink {
    pub(crate) fn new(run: u64, tx: mpsc::Sender<Inbound>) -> Self {
        Self { run, tx }
    }

    pub fn emit(&self, event: CrawlEvent) {
        self.send(Msg::Crawl(event));
    }

    /// Reports that the crawl cannot continue.
    pub fn fatal(&self, message: impl Into<String>) {
        self.send(Msg::CrawlFatal {
            message: message.into(),
        });
    }

    fn send(&self, msg: Msg) {
        let _ = self.tx.send(Inbound { run: self.run, msg });
    }
}
