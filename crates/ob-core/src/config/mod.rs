//! Application configuration.
//!
//! Maps a parsed TOML document onto [`AppConfig`]. Every key is optional; a
//! missing key keeps the default. Reading the file and environment overrides
//! belong to the bootstrap layer.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROGRESS_NAMESPACE: &str = "onboarding";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Directory name under the platform data dir.
pub const APP_DIR_NAME: &str = "onboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    pub dir: PathBuf,
    /// Keeps separate wizard drafts apart inside `dir`.
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub poll_interval_secs: u64,
}

impl ViewerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub progress: ProgressConfig,
    pub viewer: ViewerConfig,
}

impl AppConfig {
    /// Defaults with the progress directory rooted at `data_dir`.
    ///
    /// `data_dir` is computed by the caller (usually `dirs::data_local_dir()`
    /// joined with [`APP_DIR_NAME`]).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            progress: ProgressConfig {
                dir: data_dir,
                namespace: DEFAULT_PROGRESS_NAMESPACE.to_string(),
            },
            viewer: ViewerConfig {
                poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            },
        }
    }

    /// Platform data dir for the app, `None` when the platform has none.
    pub fn default_data_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME))
    }

    /// Parse `toml_value` on top of the platform defaults.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let data_dir = Self::default_data_dir().unwrap_or_else(|| PathBuf::from(APP_DIR_NAME));
        Self::with_system_defaults(data_dir).merge_toml(toml_value)
    }

    /// Overlay every key present in `toml_value`.
    ///
    /// A key with the wrong type is an error rather than silently ignored.
    pub fn merge_toml(mut self, toml_value: &toml::Value) -> anyhow::Result<Self> {
        if let Some(base_url) = string_key(toml_value, "api", "base_url")? {
            self.api.base_url = base_url;
        }
        if let Some(secs) = secs_key(toml_value, "api", "timeout_secs")? {
            self.api.timeout_secs = secs;
        }
        if let Some(dir) = string_key(toml_value, "progress", "dir")? {
            self.progress.dir = PathBuf::from(dir);
        }
        if let Some(namespace) = string_key(toml_value, "progress", "namespace")? {
            self.progress.namespace = namespace;
        }
        if let Some(secs) = secs_key(toml_value, "viewer", "poll_interval_secs")? {
            self.viewer.poll_interval_secs = secs;
        }
        Ok(self)
    }
}

fn lookup<'a>(toml_value: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    toml_value.get(section).and_then(|s| s.get(key))
}

fn string_key(toml_value: &toml::Value, section: &str, key: &str) -> anyhow::Result<Option<String>> {
    match lookup(toml_value, section, key) {
        None => Ok(None),
        Some(value) => match value.as_str() {
            Some(s) => Ok(Some(s.to_string())),
            None => bail!("[{section}] {key} must be a string"),
        },
    }
}

fn secs_key(toml_value: &toml::Value, section: &str, key: &str) -> anyhow::Result<Option<u64>> {
    match lookup(toml_value, section, key) {
        None => Ok(None),
        Some(value) => match value.as_integer() {
            Some(secs) if secs > 0 => Ok(Some(secs as u64)),
            _ => bail!("[{section}] {key} must be a positive integer"),
        },
    }
}
