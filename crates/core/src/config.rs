//! Operator configuration model.
//!
//! The configuration is owned by an external store (see [`ConfigStore`]);
//! the core only ever reads an immutable snapshot taken once at the start of
//! a run, so a save racing a run can never change safety thresholds
//! mid-evaluation. Field-level validation uses `validator` derive; the
//! cross-field checks live in [`Config::ensure_valid`].

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Errors raised by configuration loading, storage, and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration could not be read from its backing store.
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// The configuration could not be written to its backing store.
    #[error("Failed to store configuration: {0}")]
    Store(String),

    /// The configuration is malformed or incomplete.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ConfigError::Invalid(errors.to_string())
    }
}

/// Runtime environment tag.
///
/// `Local` models development mounts where hardlink accounting is
/// unreliable; destructive runs are denied there unconditionally. The
/// default is `Local` so a fresh configuration cannot delete anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Local,
}

impl Environment {
    /// Whether destructive runs are permitted in this environment.
    pub fn allows_deletion(self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Local => write!(f, "local"),
        }
    }
}

/// Connection settings for the download client (qBittorrent WebUI API).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DownloadClientConfig {
    /// Base URL of the WebUI, e.g. `http://localhost:8080`.
    #[validate(url)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Per-library-manager settings (one per Radarr/Sonarr-style instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LibraryConfig {
    /// Display name, also used as the key in run summaries.
    #[validate(length(min = 1))]
    pub name: String,
    /// Disabled libraries are skipped entirely (not even health-checked
    /// beyond reporting `disabled`).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL of the library manager, e.g. `http://localhost:7878`.
    #[validate(url)]
    pub url: String,
    #[validate(length(min = 1))]
    pub api_key: String,
    /// Download category this library claims. When set, items outside the
    /// category are never eligible for this library.
    #[serde(default)]
    pub category: Option<String>,
    /// Minimum days an item must have seeded after completion.
    #[serde(default = "default_min_seed_days")]
    pub min_seed_days: u32,
}

/// Global operator configuration read by the gate and evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Config {
    /// When set, execute runs are denied by the safety gate. Defaults to
    /// `true` so a fresh configuration is simulation-only.
    #[serde(default = "default_true")]
    pub dry_run: bool,
    #[serde(default)]
    pub environment: Environment,
    /// Ceiling on the fraction of managed items a single run may delete,
    /// in percent. `None` disables the check.
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub max_delete_percent: Option<f64>,
    #[validate(nested)]
    pub download_client: DownloadClientConfig,
    #[validate(nested)]
    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: true,
            environment: Environment::default(),
            max_delete_percent: None,
            download_client: DownloadClientConfig::default(),
            libraries: Vec::new(),
        }
    }
}

impl Config {
    /// Validate field constraints plus the cross-field invariants that
    /// `validator` cannot express. A run never starts on a config that
    /// fails this check.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        self.validate()?;

        let mut seen = std::collections::HashSet::new();
        for library in &self.libraries {
            if !seen.insert(library.name.to_ascii_lowercase()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate library name '{}'",
                    library.name
                )));
            }
        }

        Ok(())
    }

    /// Enabled libraries in configuration order.
    pub fn enabled_libraries(&self) -> impl Iterator<Item = &LibraryConfig> {
        self.libraries.iter().filter(|l| l.enabled)
    }
}

fn default_true() -> bool {
    true
}

fn default_min_seed_days() -> u32 {
    30
}

/// Capability interface for the external configuration store.
///
/// The core reads a snapshot via `get` at the start of every run; `set` is
/// only called by the settings surface in the API crate.
#[async_trait::async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self) -> Result<Config, ConfigError>;
    async fn set(&self, config: &Config) -> Result<(), ConfigError>;
}
