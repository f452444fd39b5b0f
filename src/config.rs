//! Configuration file loading.
//!
//! Settings come from `~/.config/pixel-finder/config.toml` (or the
//! platform equivalent). Every field is optional and a missing file is
//! not an error. The API key can also come from `PIXABAY_API_KEY`, which
//! wins over the file.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://pixabay.com/api/";
pub const DEFAULT_PER_PAGE: u32 = 12;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable holding the service credential
pub const API_KEY_ENV: &str = "PIXABAY_API_KEY";

/// Page sizes the search API accepts
const PER_PAGE_RANGE: std::ops::RangeInclusive<u32> = 3..=200;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    /// A value parsed but is outside what the app can use.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// TOML configuration file structure.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Pixabay API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Search endpoint, mostly useful for pointing at a mock server
    #[serde(default)]
    pub base_url: Option<String>,

    /// Results per page
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Timeout for every HTTP request, in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Path to log file for tracing output
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved settings after applying defaults, the file and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub per_page: u32,
    pub request_timeout: Duration,
    pub log_file_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file_path: default_log_path(),
        }
    }
}

impl Settings {
    /// Load from the default config path and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = match default_config_path() {
            Some(path) => load_config_file(path)?,
            None => None,
        };
        let settings = Self::resolve(file.unwrap_or_default())?;
        Ok(settings.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Merge a parsed config file over the defaults
    pub fn resolve(file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let per_page = file.per_page.unwrap_or(defaults.per_page);
        if !PER_PAGE_RANGE.contains(&per_page) {
            return Err(ConfigError::InvalidValue {
                field: "per_page",
                reason: format!(
                    "{per_page} is outside {}..={}",
                    PER_PAGE_RANGE.start(),
                    PER_PAGE_RANGE.end()
                ),
            });
        }

        let timeout_secs = file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            api_key: file.api_key.unwrap_or(defaults.api_key),
            base_url: file.base_url.unwrap_or(defaults.base_url),
            per_page,
            request_timeout: Duration::from_secs(timeout_secs),
            log_file_path: file.log_file_path.unwrap_or(defaults.log_file_path),
        })
    }

    /// Apply environment overrides, looked up through `lookup`.
    ///
    /// Checks for:
    /// - `PIXABAY_API_KEY`: Override the API key (ignored when blank)
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV) {
            let key = key.trim();
            if !key.is_empty() {
                self.api_key = key.to_string();
            }
        }
        self
    }
}

/// Resolve default config file path.
///
/// Returns `~/.config/pixel-finder/config.toml` on Linux, appropriate path on
/// other platforms, or `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pixel-finder").join("config.toml"))
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/pixel-finder/pixel-finder.log` on Linux. Platforms
/// without a state directory fall back to the cache directory, then the
/// current directory.
pub fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("pixel-finder").join("pixel-finder.log"))
        .unwrap_or_else(|| PathBuf::from("pixel-finder.log"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pixel_finder_config_{name}"));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("pixel_finder_config_missing/config.toml");
        let _ = fs::remove_file(&path);

        assert_eq!(load_config_file(path).unwrap(), None);
    }

    #[test]
    fn test_load_full_file() {
        let path = temp_config(
            "full",
            r#"
api_key = "abc123"
base_url = "http://localhost:8080/api/"
per_page = 24
request_timeout_secs = 5
log_file_path = "/tmp/pf.log"
"#,
        );

        let file = load_config_file(&path).unwrap().unwrap();
        let settings = Settings::resolve(file).unwrap();

        assert_eq!(settings.api_key, "abc123");
        assert_eq!(settings.base_url, "http://localhost:8080/api/");
        assert_eq!(settings.per_page, 24);
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.log_file_path, PathBuf::from("/tmp/pf.log"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let path = temp_config("invalid", "per_page = [not toml");

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file: ConfigFile = toml::from_str("").unwrap();
        let settings = Settings::resolve(file).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.per_page, 12);
    }

    #[test]
    fn test_per_page_out_of_range() {
        let file = ConfigFile {
            per_page: Some(500),
            ..ConfigFile::default()
        };

        let err = Settings::resolve(file).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "per_page", .. }));
    }

    #[test]
    fn test_env_overrides_api_key() {
        let file = ConfigFile {
            api_key: Some("from-file".to_string()),
            ..ConfigFile::default()
        };
        let settings = Settings::resolve(file).unwrap();

        let overridden = settings
            .clone()
            .with_env_overrides(|key| (key == API_KEY_ENV).then(|| "from-env".to_string()));
        assert_eq!(overridden.api_key, "from-env");

        let blank = settings.with_env_overrides(|_| Some("   ".to_string()));
        assert_eq!(blank.api_key, "from-file");
    }
}
