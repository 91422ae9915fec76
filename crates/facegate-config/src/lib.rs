//! Configuration management for Facegate
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (FACEGATE_* prefix, highest precedence)
//! 2. facegate.local.toml (gitignored, local overrides)
//! 3. facegate.toml (project config)
//! 4. ~/.config/facegate/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! The role hierarchy is not configurable; it is fixed at build time.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main Facegate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacegateConfig {
    pub store: StoreConfig,
    pub camera: CameraConfig,
    pub recognition: RecognitionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding enrolled identities.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".facegate/identities.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub source: CameraSource,
    /// Script consumed by the `replay` source.
    pub replay_script: Option<PathBuf>,
    /// Restart the script from the first frame once exhausted.
    pub loop_replay: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: CameraSource::Replay,
            replay_script: None,
            loop_replay: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CameraSource {
    Replay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Maximum signature distance still considered the same face.
    pub tolerance: f64,
    /// Pause between frames while recognition is active.
    pub frame_interval_ms: u64,
    /// Begin sampling as soon as the session starts.
    pub start_active: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.6,
            frame_interval_ms: 33,
            start_active: false,
        }
    }
}

impl RecognitionConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl FacegateConfig {
    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Rejects values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.recognition.tolerance.is_finite() || self.recognition.tolerance < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "recognition.tolerance must be a non-negative number, got {}",
                self.recognition.tolerance
            )));
        }
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "store.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if self.store.path.is_relative() {
            self.store.path = base.join(&self.store.path);
        }

        if let Some(script) = &self.camera.replay_script {
            if script.is_relative() {
                self.camera.replay_script = Some(base.join(script));
            }
        }
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
