//! Configuration management for the catalog binaries.

use crate::{CoreError, CoreResult, Paths};
use catalog_engine::LayoutMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const ENV_LOG_LEVEL: &str = "EMOJI_CATALOG_LOG_LEVEL";
const ENV_LAYOUT: &str = "EMOJI_CATALOG_LAYOUT";

/// Catalog configuration, stored as JSON at `<base>/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Load the starter catalog when no catalog file is given.
    pub seed_starter_catalog: bool,
    /// Layout mode at startup.
    pub initial_layout: LayoutMode,
    /// JSON catalog to import at startup.
    pub catalog_file: Option<PathBuf>,
    /// Write JSONL logs under the logs directory.
    pub log_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            seed_starter_catalog: true,
            initial_layout: LayoutMode::Grid,
            catalog_file: None,
            log_to_file: true,
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Applies overrides looked up by environment variable name.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> CoreResult<()> {
        if let Some(log_level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = log_level;
        }
        if let Some(layout) = lookup(ENV_LAYOUT) {
            self.initial_layout = LayoutMode::parse(&layout).ok_or_else(|| {
                CoreError::Config(format!(
                    "{ENV_LAYOUT} must be `grid` or `column`, got `{layout}`"
                ))
            })?;
        }
        Ok(())
    }
}
