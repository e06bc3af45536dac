use mirror_core::{CoreError, Effect};
use mirror_logging::{mirror_error, mirror_info};
use mirror_store::JsonStore;

use crate::persistence;
use crate::{Crawler, CrawlerSink};

pub type Notifier = Box<dyn FnMut(&str) + Send>;

/// Carries out the effects `update` asks for.
pub struct EffectRunner {
    store: JsonStore,
    crawler: Option<Box<dyn Crawler>>,
    notifier: Notifier,
}

impl EffectRunner {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store,
            crawler: None,
            notifier: Box::new(|summary| mirror_info!("Notification: {}", summary)),
        }
    }

    pub fn set_crawler(&mut self, crawler: Box<dyn Crawler>) {
        self.crawler = Some(crawler);
    }

    pub fn set_notifier(&mut self, notifier: Notifier) {
        self.notifier = notifier;
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Runs every effect in order and hands back the rejection, if any.
    pub fn run(&mut self, effects: Vec<Effect>, sink: &CrawlerSink) -> Result<(), CoreError> {
        let mut rejected = None;
        for effect in effects {
            match effect {
                Effect::StartCrawl { config } => match self.crawler.as_mut() {
                    Some(crawler) => {
                        mirror_info!(
                            "StartCrawl url={} depth={} retries={} images={}",
                            config.url(),
                            config.max_depth(),
                            config.retries(),
                            config.include_images()
                        );
                        crawler.start(config, sink.clone());
                    }
                    None => {
                        mirror_error!("StartCrawl with no crawler attached");
                        sink.fatal("no crawler attached");
                    }
                },
                Effect::StopCrawl => {
                    if let Some(crawler) = self.crawler.as_mut() {
                        crawler.stop();
                    }
                }
                Effect::PersistHistory(entries) => persistence::save_history(&self.store, &entries),
                Effect::PersistPresets(presets) => persistence::save_presets(&self.store, &presets),
                Effect::PersistSettings(settings) => {
                    persistence::save_settings(&self.store, &settings)
                }
                Effect::Notify { summary } => (self.notifier)(&summary),
                Effect::Rejected(err) => rejected = Some(err),
            }
        }
        match rejected {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
