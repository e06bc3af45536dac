use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};

use mirror_core::{update, AppState, AppViewModel, Effect, Msg, SessionStatus};
use mirror_logging::{mirror_debug, mirror_info, mirror_warn};
use mirror_store::JsonStore;

use crate::crawler::Inbound;
use crate::effects::{EffectRunner, Notifier};
use crate::persistence;
use crate::{AppError, Crawler, CrawlerSink};

/// Sole owner and writer of the [`AppState`].
///
/// User actions go through [`dispatch`](Self::dispatch); crawler reports
/// queue up on a channel and are applied one at a time, in arrival order,
/// by [`drain`](Self::drain) or [`wait_for_terminal`](Self::wait_for_terminal).
/// Every start opens a new run; reports from earlier runs are discarded.
pub struct SessionController {
    shared: Arc<Mutex<AppState>>,
    run: u64,
    inbound_tx: mpsc::Sender<Inbound>,
    inbound_rx: mpsc::Receiver<Inbound>,
    runner: EffectRunner,
    subscribers: Vec<mpsc::Sender<AppViewModel>>,
}

/// Read-only handle for other threads. Each read is a consistent snapshot.
#[derive(Clone)]
pub struct StateReader {
    shared: Arc<Mutex<AppState>>,
}

impl StateReader {
    pub fn snapshot(&self) -> AppViewModel {
        lock(&self.shared).view()
    }

    pub fn status(&self) -> SessionStatus {
        lock(&self.shared).session().status()
    }
}

impl SessionController {
    pub fn new(store: JsonStore) -> Self {
        Self::with_state(AppState::new(), store)
    }

    pub fn with_state(state: AppState, store: JsonStore) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel();
        Self {
            shared: Arc::new(Mutex::new(state)),
            run: 0,
            inbound_tx,
            inbound_rx,
            runner: EffectRunner::new(store),
            subscribers: Vec::new(),
        }
    }

    pub fn with_crawler(mut self, crawler: Box<dyn Crawler>) -> Self {
        self.runner.set_crawler(crawler);
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.runner.set_notifier(notifier);
        self
    }

    /// Loads history, presets and settings from the store.
    pub fn restore(&mut self) {
        for msg in persistence::restore_messages(self.runner.store()) {
            if let Err(err) = self.dispatch(msg) {
                mirror_warn!("Ignoring persisted record: {}", err);
            }
        }
    }

    /// A sink for the current run, to hand to a crawler that is driven
    /// outside this controller.
    pub fn sink(&self) -> CrawlerSink {
        CrawlerSink::new(self.run, self.inbound_tx.clone())
    }

    pub fn reader(&self) -> StateReader {
        StateReader {
            shared: self.shared.clone(),
        }
    }

    /// Receives a fresh view after every change.
    pub fn subscribe(&mut self) -> mpsc::Receiver<AppViewModel> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn snapshot(&self) -> AppViewModel {
        lock(&self.shared).view()
    }

    pub fn status(&self) -> SessionStatus {
        lock(&self.shared).session().status()
    }

    /// Applies one message atomically, notifies subscribers, then runs the
    /// resulting effects.
    pub fn dispatch(&mut self, msg: Msg) -> Result<(), AppError> {
        let (maybe_view, effects) = {
            let mut guard = lock(&self.shared);
            let state = std::mem::take(&mut *guard);
            let (mut state, effects) = update(state, msg);
            let was_dirty = state.consume_dirty();
            let view = was_dirty.then(|| state.view());
            *guard = state;
            (view, effects)
        };

        if let Some(view) = maybe_view {
            self.notify_subscribers(view);
        }

        if effects
            .iter()
            .any(|effect| matches!(effect, Effect::StartCrawl { .. }))
        {
            self.run += 1;
            mirror_debug!("Opened crawl run {}", self.run);
        }
        let sink = self.sink();
        self.runner.run(effects, &sink)?;
        Ok(())
    }

    /// Applies every queued crawler message of the current run, in arrival
    /// order, and returns how many were applied. Messages the core refuses
    /// are logged and skipped; the first refusal is returned once the queue
    /// is empty.
    pub fn drain(&mut self) -> Result<usize, AppError> {
        let mut applied = 0;
        let mut first_refusal = None;
        while let Ok(inbound) = self.inbound_rx.try_recv() {
            let Some(msg) = self.accept(inbound) else {
                continue;
            };
            match self.dispatch(msg) {
                Ok(()) => applied += 1,
                Err(err) => {
                    mirror_warn!("Dropped crawler message: {}", err);
                    first_refusal.get_or_insert(err);
                }
            }
        }
        match first_refusal {
            Some(err) => Err(err),
            None => Ok(applied),
        }
    }

    /// Blocks applying crawler messages until the session leaves
    /// `downloading`, then returns the final view.
    pub fn wait_for_terminal(&mut self) -> Result<AppViewModel, AppError> {
        while self.status() == SessionStatus::Downloading {
            // We hold a sender ourselves, so the channel never disconnects.
            let Ok(inbound) = self.inbound_rx.recv() else {
                break;
            };
            if let Some(msg) = self.accept(inbound) {
                self.dispatch(msg)?;
            }
        }
        Ok(self.snapshot())
    }

    /// Stops a running crawl, recording it as stopped.
    pub fn shutdown(&mut self) -> Result<(), AppError> {
        if self.status() == SessionStatus::Downloading {
            mirror_info!("Stopping active crawl on shutdown");
            self.dispatch(Msg::StopClicked)?;
        }
        Ok(())
    }

    fn accept(&self, inbound: Inbound) -> Option<Msg> {
        if inbound.run == self.run {
            return Some(inbound.msg);
        }
        mirror_debug!(
            "Discarding report from run {} (current run {})",
            inbound.run,
            self.run
        );
        None
    }

    fn notify_subscribers(&mut self, view: AppViewModel) {
        self.subscribers.retain(|tx| tx.send(view.clone()).is_ok());
        mirror_debug!("Notified {} subscribers", self.subscribers.len());
    }
}

fn lock(shared: &Mutex<AppState>) -> MutexGuard<'_, AppState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
