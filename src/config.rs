use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::BumpMode;
use crate::engine::BumpRequest;
use crate::error::{BumpError, Result};
use crate::reporter::Reporter;
use crate::warning::BumpWarning;
use crate::workspace::{DEFAULT_CONCURRENCY, DEFAULT_MANIFEST};

/// Project configuration file looked up at the root
pub const CONFIG_FILE: &str = "verbump.toml";

/// User-level configuration file inside the config directory
pub const USER_CONFIG_FILE: &str = ".verbump.toml";

/// Represents the complete configuration for verbump.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub bump: BumpSettings,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_manifest() -> String {
    DEFAULT_MANIFEST.to_string()
}

/// The `[bump]` table.
///
/// Keys also accept their camelCase project-config spellings
/// (`bumpFilter`, `bumpMode`, `bumpDisable`, `bumpSet`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BumpSettings {
    /// Glob patterns, paths or stems of files to update
    #[serde(default, alias = "bumpFilter")]
    pub filter: Vec<String>,

    #[serde(default, alias = "bumpMode")]
    pub mode: BumpMode,

    #[serde(default, alias = "bumpDisable")]
    pub disable: bool,

    /// Target version for manual mode
    #[serde(default, alias = "bumpSet")]
    pub set: Option<String>,

    /// Extra ignore globs
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Manifest holding the authoritative version
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

impl Default for BumpSettings {
    fn default() -> Self {
        BumpSettings {
            filter: Vec::new(),
            mode: BumpMode::default(),
            disable: false,
            set: None,
            ignore: Vec::new(),
            concurrency: default_concurrency(),
            manifest: default_manifest(),
        }
    }
}

impl BumpSettings {
    /// Engine request carrying these settings
    pub fn request(&self) -> BumpRequest {
        BumpRequest {
            mode: self.mode,
            disabled: self.disable,
            filters: self.filter.clone(),
            ignore: self.ignore.clone(),
            custom_version: self.set.clone(),
            source: None,
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| BumpError::config(format!("Cannot read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| BumpError::config(format!("Invalid {}: {}", path.display(), e)))
}

/// Locate the configuration file for `root`.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `verbump.toml` in the project root
/// 3. `.verbump.toml` in the user config directory
pub fn config_path(config_path: Option<&Path>, root: &Path) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let project = root.join(CONFIG_FILE);
    if project.exists() {
        return Some(project);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .filter(|p| p.exists())
}

/// Loads configuration from file or returns defaults.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists (or was named explicitly) but cannot be read or parsed
pub fn load_config(path: Option<&Path>, root: &Path) -> Result<Config> {
    match config_path(path, root) {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

/// Like [`load_config`], but a failure is reported and defaults are used
pub fn load_config_or_default(path: Option<&Path>, root: &Path, reporter: &dyn Reporter) -> Config {
    match load_config(path, root) {
        Ok(config) => config,
        Err(e) => {
            let warning = BumpWarning::ConfigUnreadable {
                reason: e.to_string(),
            };
            reporter.warn(&warning.to_string());
            Config::default()
        }
    }
}
