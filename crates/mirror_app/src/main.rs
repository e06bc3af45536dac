mod cli;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;
use mirror_app::{ReplayCrawler, SessionController};
use mirror_core::{AppViewModel, HistoryId, Msg, PresetId, Timestamp};
use mirror_logging::{mirror_info, LogDestination};
use mirror_store::{default_store_dir, JsonStore};

use cli::{Cli, Commands, ConfigArgs, PresetAction, SettingsAction};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let destination = match cli.log_file {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    mirror_logging::initialize(destination, level);

    let dir = cli.config_dir.unwrap_or_else(default_store_dir);
    mirror_info!("Using config dir {:?}", dir);
    let store = JsonStore::new(dir);

    match cli.command {
        Commands::Run {
            config,
            preset,
            from_history,
            replay,
            delay_ms,
        } => run_session(store, config, preset, from_history, replay, delay_ms),
        Commands::History { clear } => history(store, clear),
        Commands::Presets { action } => presets(store, action),
        Commands::Settings { action } => settings(store, action),
    }
}

fn restored(store: JsonStore) -> SessionController {
    let mut controller = SessionController::new(store);
    controller.restore();
    controller
}

fn run_session(
    store: JsonStore,
    config: ConfigArgs,
    preset: Option<String>,
    from_history: Option<String>,
    replay: PathBuf,
    delay_ms: u64,
) -> Result<()> {
    let crawler = ReplayCrawler::from_path(&replay)
        .with_context(|| format!("loading recording {}", replay.display()))?
        .with_delay(Duration::from_millis(delay_ms));
    let mut controller = SessionController::new(store)
        .with_crawler(Box::new(crawler))
        .with_notifier(Box::new(|summary| println!("{summary}")));
    controller.restore();

    if let Some(id) = preset {
        let id: PresetId = id.parse().with_context(|| format!("invalid preset id {id}"))?;
        controller.dispatch(Msg::PresetApplied(id))?;
    }
    if let Some(id) = from_history {
        let id: HistoryId = id
            .parse()
            .with_context(|| format!("invalid history id {id}"))?;
        controller.dispatch(Msg::HistoryRerun(id))?;
    }
    controller.dispatch(Msg::ConfigEdited(config.into_patch()))?;

    if !controller.snapshot().can_start {
        bail!("both --url and --output are required to start");
    }
    controller.dispatch(Msg::StartClicked)?;
    let view = controller.wait_for_terminal()?;
    print_log(&view);
    println!(
        "{}: {} downloaded, {} errors",
        view.status, view.downloaded_count, view.error_count
    );
    Ok(())
}

fn print_log(view: &AppViewModel) {
    for entry in &view.log {
        println!(
            "{} [{:?}] {}",
            format_time(entry.timestamp()),
            entry.severity(),
            entry.message()
        );
    }
}

fn history(store: JsonStore, clear: bool) -> Result<()> {
    let mut controller = restored(store);
    if clear {
        controller.dispatch(Msg::HistoryCleared)?;
        println!("History cleared");
        return Ok(());
    }

    let view = controller.snapshot();
    if view.history.is_empty() {
        println!("No runs yet");
    }
    for entry in &view.history {
        println!(
            "{}  {}  {:<9} {} -> {} ({} downloaded, {} errors)",
            entry.id,
            format_time(entry.started_at),
            entry.terminal_status,
            entry.url,
            entry.output_path,
            entry.downloaded_count,
            entry.error_count
        );
    }
    Ok(())
}

fn presets(store: JsonStore, action: PresetAction) -> Result<()> {
    let mut controller = restored(store);
    match action {
        PresetAction::List => {
            for preset in &controller.snapshot().presets {
                println!(
                    "{}  {}  {} -> {}",
                    preset.id,
                    preset.name,
                    preset.config.url(),
                    preset.config.output_path()
                );
            }
        }
        PresetAction::Save { name, config } => {
            controller.dispatch(Msg::ConfigEdited(config.into_patch()))?;
            controller.dispatch(Msg::PresetCreated { name })?;
            if let Some(preset) = controller.snapshot().presets.last() {
                println!("Saved preset {} ({})", preset.name, preset.id);
            }
        }
        PresetAction::Delete { id } => {
            let id: PresetId = id.parse().with_context(|| format!("invalid preset id {id}"))?;
            controller.dispatch(Msg::PresetDeleted(id))?;
            println!("Deleted preset {id}");
        }
    }
    Ok(())
}

fn settings(store: JsonStore, action: SettingsAction) -> Result<()> {
    let mut controller = restored(store);
    let mut settings = controller.snapshot().settings;
    match action {
        SettingsAction::Show => {}
        SettingsAction::Set {
            theme,
            default_output,
            default_concurrency,
            default_max_depth,
            default_retries,
            include_images,
            notifications,
        } => {
            if let Some(theme) = theme {
                settings.theme = theme.into();
            }
            if let Some(output) = default_output {
                settings.default_output_path = output;
            }
            if let Some(concurrency) = default_concurrency {
                settings.default_concurrency = concurrency;
            }
            if let Some(depth) = default_max_depth {
                settings.default_max_depth = depth;
            }
            if let Some(retries) = default_retries {
                settings.default_retries = retries;
            }
            if let Some(images) = include_images {
                settings.include_images = images;
            }
            if let Some(notify) = notifications {
                settings.show_notifications = notify;
            }
            controller.dispatch(Msg::SettingsSaved(settings.clone()))?;
        }
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn format_time(at: Timestamp) -> String {
    at.with_timezone(&chrono::Local).format(TIME_FORMAT).to_string()
}
