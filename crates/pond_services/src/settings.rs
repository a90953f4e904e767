//! Settings management
//!
//! Settings come from a JSON file. Every section and field is optional;
//! missing values keep their defaults.

use pond_core::{PondConfig, PondError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit settings file.
pub const SETTINGS_ENV: &str = "POND_SETTINGS";
/// File picked up from the working directory when the variable is unset.
pub const DEFAULT_SETTINGS_FILE: &str = "pond.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid simulation settings: {0}")]
    Simulation(#[from] PondError),

    #[error("invalid runtime setting '{field}': {reason}")]
    Runtime {
        field: &'static str,
        reason: &'static str,
    },
}

/// Host settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub runtime: RuntimeSettings,
    pub input: InputSettings,
    pub simulation: PondConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Run without a window for `headless_frames` frames.
    pub headless: bool,
    pub headless_frames: u64,
    /// Fixed step used in headless mode and as the windowed fallback.
    pub fixed_delta_secs: f32,
    /// Largest delta fed to the simulation after a stall.
    pub max_delta_secs: f32,
    /// Frames between metrics log lines; 0 disables them.
    pub metrics_log_interval: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Timescale change per Up/Down key press.
    pub timescale_step: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Pond Nitrogen Cycle".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            headless: false,
            headless_frames: 600,
            fixed_delta_secs: pond_core::time::DEFAULT_FRAME_DELTA_SECS,
            max_delta_secs: 0.1,
            metrics_log_interval: 300,
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            timescale_step: 0.05,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Load from `$POND_SETTINGS`, else `./pond.json` if present, else
    /// defaults. Returns the file used, if any.
    pub fn discover() -> Result<(Self, Option<PathBuf>), SettingsError> {
        let explicit = std::env::var_os(SETTINGS_ENV).map(PathBuf::from);
        Self::discover_from(explicit, Path::new(DEFAULT_SETTINGS_FILE))
    }

    fn discover_from(
        explicit: Option<PathBuf>,
        fallback: &Path,
    ) -> Result<(Self, Option<PathBuf>), SettingsError> {
        if let Some(path) = explicit {
            let settings = Self::load(&path)?;
            return Ok((settings, Some(path)));
        }
        if fallback.is_file() {
            let settings = Self::load(fallback)?;
            return Ok((settings, Some(fallback.to_path_buf())));
        }
        tracing::info!("no settings file found, using defaults");
        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.simulation.validate()?;
        let runtime = &self.runtime;
        if !(runtime.fixed_delta_secs.is_finite() && runtime.fixed_delta_secs > 0.0) {
            return Err(SettingsError::Runtime {
                field: "runtime.fixed_delta_secs",
                reason: "must be positive",
            });
        }
        if !runtime.max_delta_secs.is_finite() {
            return Err(SettingsError::Runtime {
                field: "runtime.max_delta_secs",
                reason: "must be finite",
            });
        }
        if runtime.max_delta_secs < runtime.fixed_delta_secs {
            return Err(SettingsError::Runtime {
                field: "runtime.max_delta_secs",
                reason: "must not be below fixed_delta_secs",
            });
        }
        if !(self.input.timescale_step > 0.0 && self.input.timescale_step <= 1.0) {
            return Err(SettingsError::Runtime {
                field: "input.timescale_step",
                reason: "must lie in (0, 1]",
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
