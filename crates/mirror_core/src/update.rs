use mirror_logging::{mirror_debug, mirror_warn};

use crate::{
    AppState, CoreError, Effect, HistoryEntry, HistoryLog, LookupError, MirrorConfig, Msg,
    PresetBook,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// A refused message leaves the state untouched and yields a single
/// [`Effect::Rejected`].
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match apply(&mut state, msg) {
        Ok(effects) => effects,
        Err(err) => {
            mirror_warn!("Rejected message: {}", err);
            vec![Effect::Rejected(err)]
        }
    };

    (state, effects)
}

fn apply(state: &mut AppState, msg: Msg) -> Result<Vec<Effect>, CoreError> {
    let effects = match msg {
        Msg::ConfigEdited(patch) => {
            state.config_mut()?.apply(patch);
            state.mark_dirty();
            Vec::new()
        }
        Msg::StartClicked => {
            let now = state.clock.now();
            state.session.start(&state.config, now)?;
            state.mark_dirty();
            vec![Effect::StartCrawl {
                config: state.config.clone(),
            }]
        }
        Msg::StopClicked => {
            let now = state.clock.now();
            let entry = state.session.stop(now)?;
            let mut effects = vec![Effect::StopCrawl];
            effects.extend(record_terminal(state, entry));
            effects
        }
        Msg::ResetClicked => {
            state.session.reset()?;
            state.mark_dirty();
            Vec::new()
        }
        Msg::Crawl(event) => {
            let now = state.clock.now();
            let finished = state.session.apply_event(event, now)?;
            state.mark_dirty();
            match finished {
                Some(entry) => record_terminal(state, entry),
                None => Vec::new(),
            }
        }
        Msg::CrawlFatal { message } => {
            let now = state.clock.now();
            let entry = state.session.fail(&message, now)?;
            record_terminal(state, entry)
        }
        Msg::PresetCreated { name } => {
            let now = state.clock.now();
            let preset = state.presets.create(&name, &state.config, now)?;
            mirror_debug!("Saved preset {:?} id={}", preset.name, preset.id);
            state.mark_dirty();
            vec![Effect::PersistPresets(state.presets.list().to_vec())]
        }
        Msg::PresetDeleted(id) => {
            state.presets.delete(id)?;
            state.mark_dirty();
            vec![Effect::PersistPresets(state.presets.list().to_vec())]
        }
        Msg::PresetApplied(id) => {
            let config = state
                .presets
                .get(id)
                .ok_or(LookupError::Preset(id))?
                .config
                .clone();
            *state.config_mut()? = config;
            state.mark_dirty();
            Vec::new()
        }
        Msg::HistoryCleared => {
            state.history.clear();
            state.mark_dirty();
            vec![Effect::PersistHistory(Vec::new())]
        }
        Msg::HistoryRerun(id) => {
            let config = state
                .history
                .get(id)
                .ok_or(LookupError::History(id))?
                .config
                .clone();
            *state.config_mut()? = config;
            state.mark_dirty();
            Vec::new()
        }
        Msg::SettingsSaved(settings) => {
            settings.validate()?;
            mirror_debug!("Settings saved theme={:?}", settings.theme);
            state.settings = settings;
            state.mark_dirty();
            vec![Effect::PersistSettings(state.settings.clone())]
        }
        Msg::RestoreHistory(entries) => {
            state.history = HistoryLog::restore(entries);
            state.mark_dirty();
            Vec::new()
        }
        Msg::RestorePresets(presets) => {
            state.presets = PresetBook::restore(presets);
            state.mark_dirty();
            Vec::new()
        }
        Msg::RestoreSettings(settings) => {
            settings.validate()?;
            // Seed the form from the defaults only while the user has not touched it.
            if !state.is_downloading() && state.config == MirrorConfig::default() {
                state.config = MirrorConfig::from_settings(&settings);
            }
            state.settings = settings;
            state.mark_dirty();
            Vec::new()
        }
    };

    Ok(effects)
}

fn record_terminal(state: &mut AppState, entry: HistoryEntry) -> Vec<Effect> {
    let summary = format!(
        "Mirror of {} {}: {} downloaded, {} errors",
        entry.url, entry.terminal_status, entry.downloaded_count, entry.error_count
    );
    state.history.push(entry);
    state.mark_dirty();

    let mut effects = vec![Effect::PersistHistory(state.history.to_vec())];
    if state.settings.show_notifications {
        effects.push(Effect::Notify { summary });
    }
    effects
}
