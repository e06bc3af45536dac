use std::collections::BTreeSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Settings;

pub const DEFAULT_MAX_DEPTH: u32 = 50;
pub const DEFAULT_CONCURRENCY: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => unreachable!(),
};
pub const DEFAULT_RETRIES: u32 = 3;

const DEFAULT_BLACKLIST: &[&str] = &["https://github"];
const DEFAULT_TRACKED_EXTENSIONS: &[&str] = &[".js", ".css", ".woff2", ".woff", ".ttf"];
const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[".png", ".svg", ".jpg", ".jpeg", ".gif", ".webp"];

/// Tunable parameters of one crawl.
///
/// `domain` is always derived from `url`; the only way to change `url` is
/// [`MirrorConfig::apply`], which recomputes it. A stored `domain` is
/// ignored on load and derived again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredConfig")]
pub struct MirrorConfig {
    url: String,
    domain: String,
    #[serde(rename = "output")]
    output_path: String,
    max_depth: u32,
    #[serde(rename = "concurrent")]
    concurrency: NonZeroU32,
    retries: u32,
    include_images: bool,
    blacklist: BTreeSet<String>,
    #[serde(rename = "extensions")]
    tracked_extensions: BTreeSet<String>,
    image_extensions: BTreeSet<String>,
}

/// On-disk shape of a [`MirrorConfig`], minus the derived `domain`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredConfig {
    url: String,
    #[serde(rename = "output")]
    output_path: String,
    max_depth: u32,
    #[serde(rename = "concurrent")]
    concurrency: NonZeroU32,
    retries: u32,
    include_images: bool,
    blacklist: BTreeSet<String>,
    #[serde(rename = "extensions")]
    tracked_extensions: BTreeSet<String>,
    image_extensions: BTreeSet<String>,
}

impl From<StoredConfig> for MirrorConfig {
    fn from(stored: StoredConfig) -> Self {
        Self {
            domain: extract_domain(&stored.url),
            url: stored.url,
            output_path: stored.output_path,
            max_depth: stored.max_depth,
            concurrency: stored.concurrency,
            retries: stored.retries,
            include_images: stored.include_images,
            blacklist: stored.blacklist,
            tracked_extensions: stored.tracked_extensions,
            image_extensions: stored.image_extensions,
        }
    }
}

/// A partial edit of a [`MirrorConfig`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub url: Option<String>,
    pub output_path: Option<String>,
    pub max_depth: Option<u32>,
    pub concurrency: Option<NonZeroU32>,
    pub retries: Option<u32>,
    pub include_images: Option<bool>,
    pub blacklist: Option<BTreeSet<String>>,
    pub tracked_extensions: Option<BTreeSet<String>>,
    pub image_extensions: Option<BTreeSet<String>>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            domain: String::new(),
            output_path: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: DEFAULT_CONCURRENCY,
            retries: DEFAULT_RETRIES,
            include_images: false,
            blacklist: to_set(DEFAULT_BLACKLIST),
            tracked_extensions: to_set(DEFAULT_TRACKED_EXTENSIONS),
            image_extensions: to_set(DEFAULT_IMAGE_EXTENSIONS),
        }
    }
}

impl MirrorConfig {
    /// A blank config carrying the documented defaults.
    pub fn create_default() -> Self {
        Self::default()
    }

    /// A blank config seeded from the user's default preferences.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            output_path: settings.default_output_path.clone(),
            max_depth: settings.default_max_depth,
            concurrency: NonZeroU32::new(settings.default_concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
            retries: settings.default_retries,
            include_images: settings.include_images,
            ..Self::default()
        }
    }

    /// Merges `patch` into this config. A malformed url is stored as typed
    /// and leaves `domain` empty.
    pub fn apply(&mut self, patch: ConfigPatch) {
        let ConfigPatch {
            url,
            output_path,
            max_depth,
            concurrency,
            retries,
            include_images,
            blacklist,
            tracked_extensions,
            image_extensions,
        } = patch;

        if let Some(url) = url {
            self.domain = extract_domain(&url);
            self.url = url;
        }
        if let Some(output_path) = output_path {
            self.output_path = output_path;
        }
        if let Some(max_depth) = max_depth {
            self.max_depth = max_depth;
        }
        if let Some(concurrency) = concurrency {
            self.concurrency = concurrency;
        }
        if let Some(retries) = retries {
            self.retries = retries;
        }
        if let Some(include_images) = include_images {
            self.include_images = include_images;
        }
        if let Some(blacklist) = blacklist {
            self.blacklist = blacklist;
        }
        if let Some(tracked_extensions) = tracked_extensions {
            self.tracked_extensions = tracked_extensions;
        }
        if let Some(image_extensions) = image_extensions {
            self.image_extensions = image_extensions;
        }
    }

    /// True when both the url and the output path are filled in.
    pub fn is_usable(&self) -> bool {
        !self.url.trim().is_empty() && !self.output_path.trim().is_empty()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn concurrency(&self) -> NonZeroU32 {
        self.concurrency
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn include_images(&self) -> bool {
        self.include_images
    }

    pub fn blacklist(&self) -> &BTreeSet<String> {
        &self.blacklist
    }

    pub fn tracked_extensions(&self) -> &BTreeSet<String> {
        &self.tracked_extensions
    }

    pub fn image_extensions(&self) -> &BTreeSet<String> {
        &self.image_extensions
    }
}

/// `scheme://host[:port]` of `raw`, or an empty string when it does not
/// parse or has no host. Default ports are omitted.
pub fn extract_domain(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };
    match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    }
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}
