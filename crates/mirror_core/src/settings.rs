use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_RETRIES};
use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Process-wide user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    #[serde(rename = "defaultOutput")]
    pub default_output_path: String,
    #[serde(rename = "defaultConcurrent")]
    pub default_concurrency: u32,
    pub default_max_depth: u32,
    pub default_retries: u32,
    pub include_images: bool,
    pub show_notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            default_output_path: String::new(),
            default_concurrency: DEFAULT_CONCURRENCY.get(),
            default_max_depth: DEFAULT_MAX_DEPTH,
            default_retries: DEFAULT_RETRIES,
            include_images: false,
            show_notifications: true,
        }
    }
}

impl Settings {
    /// Rejects values that must never be stored.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_concurrency == 0 {
            return Err(ValidationError::NotPositive {
                field: "defaultConcurrent",
            });
        }
        if self.default_max_depth == 0 {
            return Err(ValidationError::NotPositive {
                field: "defaultMaxDepth",
            });
        }
        Ok(())
    }
}
