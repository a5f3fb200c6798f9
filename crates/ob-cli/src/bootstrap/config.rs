//! # Configuration Loader
//!
//! Reads the TOML file, maps it onto [`AppConfig`] and applies the
//! environment override. Defaults for missing keys come from `ob-core`.

use std::path::{Path, PathBuf};

use ob_core::config::{AppConfig, APP_DIR_NAME};

/// Replaces `[api] base_url` when set.
pub const API_URL_ENV: &str = "ONBOARD_API_URL";

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config as TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[source] anyhow::Error),
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid TOML, or holds a
/// key of the wrong type.
pub fn load_config(config_path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    let toml_value: toml::Value = toml::from_str(&content)?;
    AppConfig::from_toml(&toml_value).map_err(ConfigError::Invalid)
}

/// `<platform config dir>/onboard/config.toml`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Configuration for this run.
///
/// An explicit path must exist. Without one, the default path is used when
/// present and built-in defaults otherwise.
pub fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match explicit {
        Some(path) => load_config(path)?,
        None => match default_config_path().filter(|path| path.exists()) {
            Some(path) => load_config(&path)?,
            None => AppConfig::from_toml(&toml::Value::Table(Default::default()))
                .map_err(ConfigError::Invalid)?,
        },
    };
    apply_env_overrides(&mut config, std::env::var(API_URL_ENV).ok());
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig, api_url: Option<String>) {
    if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
        config.api.base_url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_load_config_reads_valid_toml() {
        let temp_file = write_config(
            r#"
            [api]
            base_url = "https://onboard.example.com/api"
            timeout_secs = 5

            [progress]
            dir = "/srv/onboard"
            namespace = "kiosk"

            [viewer]
            poll_interval_secs = 2
        "#,
        );

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://onboard.example.com/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.progress.dir, PathBuf::from("/srv/onboard"));
        assert_eq!(config.progress.namespace, "kiosk");
        assert_eq!(config.viewer.poll_interval_secs, 2);
    }

    #[test]
    fn test_load_config_uses_defaults_for_missing_keys() {
        let temp_file = write_config("[api]\n");

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.viewer.poll_interval_secs, 10);
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_config_reports_invalid_toml() {
        let temp_file = write_config("[api\nbase_url = ");
        assert!(matches!(
            load_config(temp_file.path()).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn test_load_config_reports_wrong_types() {
        let temp_file = write_config("[viewer]\npoll_interval_secs = \"often\"\n");
        assert!(matches!(
            load_config(temp_file.path()).unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn test_env_override_replaces_base_url() {
        let mut config = AppConfig::with_system_defaults(PathBuf::from("/tmp/onboard"));

        apply_env_overrides(&mut config, Some("https://staging.example.com/api".into()));
        assert_eq!(config.api.base_url, "https://staging.example.com/api");

        apply_env_overrides(&mut config, Some("   ".into()));
        assert_eq!(config.api.base_url, "https://staging.example.com/api");
    }
}
