//! Configuration loading for Triad.
//!
//! The config file lives at `~/.triad/config.toml` and is optional. Raw
//! sections deserialize into structs with `Option` fields; [`TriadConfig::resolve`]
//! validates them into the types the rest of the workspace consumes.
//!
//! ```toml
//! [app]
//! mode = "async"
//!
//! [fetch]
//! timeout_ms = 2500
//! max_retries = 2
//! initial_backoff_ms = 300
//!
//! [endpoints]
//! base_url = "https://jsonplaceholder.typicode.com"
//!
//! [faults]
//! comments_fail = true
//! ```

mod targets;

pub use targets::{DEFAULT_BASE_URL, Endpoints, FORCED_TIMEOUT, FaultPlan, TargetResolver};

use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use triad_types::{FetchPolicy, LoadMode, ui::UiOptions};

#[derive(Debug, Default, Deserialize)]
pub struct TriadConfig {
    pub app: Option<AppConfig>,
    pub fetch: Option<FetchConfig>,
    pub endpoints: Option<EndpointsConfig>,
    pub faults: Option<FaultPlan>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid URL for {field} ({value:?}): {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("unknown load mode {0:?} (expected \"promise\" or \"async\")")]
    InvalidMode(String),
    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Initial load mode: "promise" (default) or "async".
    pub mode: Option<String>,
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Freeze the loading spinner.
    #[serde(default)]
    pub reduced_motion: bool,
}

/// Timeout and retry settings for every fetch.
#[derive(Debug, Default, Deserialize)]
pub struct FetchConfig {
    pub timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
}

/// Where the three resources are served from.
#[derive(Debug, Default, Deserialize)]
pub struct EndpointsConfig {
    pub base_url: Option<String>,
    pub users: Option<String>,
    pub posts: Option<String>,
    pub comments: Option<String>,
}

/// Fully validated settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub policy: FetchPolicy,
    /// `None` when the file does not choose; callers fall back to env, then default.
    pub mode: Option<LoadMode>,
    pub ui: UiOptions,
    pub resolver: TargetResolver,
}

impl TriadConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    pub fn fetch_policy(&self) -> Result<FetchPolicy, ConfigError> {
        let defaults = FetchPolicy::default();
        let Some(fetch) = self.fetch.as_ref() else {
            return Ok(defaults);
        };

        let timeout = match fetch.timeout_ms {
            Some(0) => {
                return Err(ConfigError::ZeroValue {
                    field: "fetch.timeout_ms",
                });
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.timeout,
        };

        Ok(FetchPolicy {
            timeout,
            max_retries: fetch.max_retries.unwrap_or(defaults.max_retries),
            initial_backoff: fetch
                .initial_backoff_ms
                .map_or(defaults.initial_backoff, Duration::from_millis),
        })
    }

    pub fn load_mode(&self) -> Result<Option<LoadMode>, ConfigError> {
        let Some(raw) = self.app.as_ref().and_then(|app| app.mode.as_deref()) else {
            return Ok(None);
        };
        LoadMode::parse(raw)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidMode(raw.to_string()))
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
                reduced_motion: app.reduced_motion,
            })
            .unwrap_or_default()
    }

    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let Some(cfg) = self.endpoints.as_ref() else {
            return Ok(Endpoints::default());
        };
        Endpoints::with_overrides(
            cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            cfg.users.as_deref(),
            cfg.posts.as_deref(),
            cfg.comments.as_deref(),
        )
    }

    #[must_use]
    pub fn fault_plan(&self) -> FaultPlan {
        self.faults.unwrap_or_default()
    }

    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let faults = self.fault_plan();
        if faults.is_active() {
            tracing::info!(?faults, "Fault injection enabled");
        }
        Ok(Settings {
            policy: self.fetch_policy()?,
            mode: self.load_mode()?,
            ui: self.ui_options(),
            resolver: TargetResolver::new(self.endpoints()?, faults),
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".triad").join("config.toml"))
}
