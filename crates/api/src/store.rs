//! JSON-file configuration store.
//!
//! Saves are atomic: the new configuration is written to a sibling temp
//! file first and then renamed over the original, so a crash mid-write can
//! never leave a truncated config behind. A missing file yields the
//! (simulation-only) default configuration so a fresh install starts safe.

use std::path::PathBuf;

use async_trait::async_trait;
use sweeparr_core::config::{Config, ConfigError, ConfigStore};

/// File-backed [`ConfigStore`].
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self) -> Result<Config, ConfigError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(ConfigError::Load(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", self.path.display())))
    }

    async fn set(&self, config: &Config) -> Result<(), ConfigError> {
        let bytes = serde_json::to_vec_pretty(config)
            .map_err(|e| ConfigError::Store(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ConfigError::Store(format!("{}: {e}", parent.display())))?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|e| ConfigError::Store(format!("{}: {e}", temp.display())))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| ConfigError::Store(format!("{}: {e}", self.path.display())))?;

        tracing::info!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }
}
