//! Command-line interface definitions and parsing

use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mirror_core::{ConfigPatch, Theme};

#[derive(Parser)]
#[command(name = "mirror", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding history.json, presets.json and settings.json
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one mirroring session and record it in history
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        /// Start from a saved preset
        #[arg(long, conflicts_with = "from_history")]
        preset: Option<String>,
        /// Start from the config of a past run
        #[arg(long)]
        from_history: Option<String>,
        /// Crawler output recording (JSON lines) to play back
        #[arg(long)]
        replay: PathBuf,
        /// Pause between replayed lines, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },
    /// List past runs, newest first
    History {
        /// Remove every entry
        #[arg(long)]
        clear: bool,
    },
    /// Manage saved presets
    Presets {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub enum PresetAction {
    /// List saved presets
    List,
    /// Save the given config under a name
    Save {
        name: String,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Delete a preset by id
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        #[arg(long)]
        default_output: Option<String>,
        #[arg(long)]
        default_concurrency: Option<u32>,
        #[arg(long)]
        default_max_depth: Option<u32>,
        #[arg(long)]
        default_retries: Option<u32>,
        #[arg(long)]
        include_images: Option<bool>,
        #[arg(long)]
        notifications: Option<bool>,
    },
}

/// Config fields; anything left out keeps its current value.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Site to mirror
    #[arg(long)]
    pub url: Option<String>,
    /// Local directory to write into
    #[arg(long)]
    pub output: Option<String>,
    #[arg(long)]
    pub max_depth: Option<u32>,
    #[arg(long)]
    pub concurrency: Option<NonZeroU32>,
    #[arg(long)]
    pub retries: Option<u32>,
    /// Also download images
    #[arg(long)]
    pub images: Option<bool>,
    /// URL prefix to skip; repeat for several
    #[arg(long = "blacklist")]
    pub blacklist: Vec<String>,
}

impl ConfigArgs {
    pub fn into_patch(self) -> ConfigPatch {
        ConfigPatch {
            url: self.url,
            output_path: self.output,
            max_depth: self.max_depth,
            concurrency: self.concurrency,
            retries: self.retries,
            include_images: self.images,
            blacklist: (!self.blacklist.is_empty())
                .then(|| self.blacklist.into_iter().collect::<BTreeSet<_>>()),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::System => Theme::System,
        }
    }
}
