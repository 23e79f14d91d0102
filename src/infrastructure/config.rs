//! Run configuration: signal tables, feed specs and view sizes.
//!
//! Read from the JSON file named by `--config` or `STACKRADAR_CONFIG`. Every
//! field has a default, so a file only needs the parts it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::dedup::DEFAULT_TOP_N;
use crate::domain::error::DomainError;
use crate::domain::values::signal_config::SignalConfig;
use crate::infrastructure::feeds::anchor::{default_feeds, default_trending, AnchorFeedSpec};
use crate::infrastructure::feeds::pinned::{costco_hot_buys_reminder, PinnedListing};

pub const CONFIG_ENV: &str = "STACKRADAR_CONFIG";

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_trending_limit() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarConfig {
    #[serde(default)]
    pub signals: SignalConfig,
    #[serde(default = "default_feeds")]
    pub feeds: Vec<AnchorFeedSpec>,
    /// `null` disables the trending section's fetch.
    #[serde(default = "default_trending_spec")]
    pub trending: Option<AnchorFeedSpec>,
    #[serde(default = "default_pinned")]
    pub pinned: Vec<PinnedListing>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
}

fn default_trending_spec() -> Option<AnchorFeedSpec> {
    Some(default_trending())
}

fn default_pinned() -> Vec<PinnedListing> {
    vec![costco_hot_buys_reminder()]
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            signals: SignalConfig::default(),
            feeds: default_feeds(),
            trending: default_trending_spec(),
            pinned: default_pinned(),
            top_n: default_top_n(),
            trending_limit: default_trending_limit(),
        }
    }
}

impl RadarConfig {
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DomainError::Config(format!("Invalid config: {e}")))?;
        if config.top_n == 0 {
            return Err(DomainError::Config("top_n must be at least 1".into()));
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_json(&json)?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Explicit path first, then `STACKRADAR_CONFIG`, else built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let env_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        match path.map(Path::to_path_buf).or(env_path) {
            Some(p) => Self::from_file(&p),
            None => Ok(Self::default()),
        }
    }
}
