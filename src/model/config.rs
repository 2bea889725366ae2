use serde::{Deserialize, Serialize};

/// Card-level tuning knobs, loadable from the host's TOML config block.
/// Every field has a default so an absent or partial config always works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    /// Sort method applied when a stored filter record has none
    #[serde(default = "default_sort_method")]
    pub default_sort_method: String,
    /// Label used to group items with no category when sorting by category
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized_label: String,
    /// Coalescing window for renders deferred while the user is typing
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Delay before the single refresh render after a confirmed save
    #[serde(default = "default_refresh_after_save_ms")]
    pub refresh_after_save_ms: u64,
    /// How long focus is still considered held after a blur, so focus moving
    /// between sibling controls doesn't flicker the interacting flag
    #[serde(default = "default_blur_settle_ms")]
    pub blur_settle_ms: u64,
}

impl Default for CardConfig {
    fn default() -> Self {
        CardConfig {
            default_sort_method: default_sort_method(),
            uncategorized_label: default_uncategorized_label(),
            debounce_ms: default_debounce_ms(),
            refresh_after_save_ms: default_refresh_after_save_ms(),
            blur_settle_ms: default_blur_settle_ms(),
        }
    }
}

impl CardConfig {
    /// Parse a TOML config block.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

fn default_sort_method() -> String {
    "name".to_string()
}

fn default_uncategorized_label() -> String {
    crate::ops::DEFAULT_UNCATEGORIZED_LABEL.to_string()
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_refresh_after_save_ms() -> u64 {
    50
}

fn default_blur_settle_ms() -> u64 {
    100
}
