//! Runtime configuration.
//!
//! Settings come from command-line flags with environment fallbacks. Only
//! the installation root has a derived default: the directory two levels
//! above the running binary, matching a `<root>/bin/lasflow` layout.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the LAStools installation root.
pub const ENV_LASTOOLS_HOME: &str = "LASTOOLS_HOME";
/// Environment variable holding the log filter directive.
pub const ENV_LOG: &str = "LASFLOW_LOG";
/// Environment variable selecting the log format.
pub const ENV_LOG_FORMAT: &str = "LASFLOW_LOG_FORMAT";

const DEFAULT_LOG_FILTER: &str = "warn";

/// How diagnostic logs are rendered on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidSetting {
                name: ENV_LOG_FORMAT,
                value: s.to_string(),
            }),
        }
    }
}

/// Runtime settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LasflowConfig {
    /// LAStools installation root; derived from the binary location when unset.
    pub install_root: Option<PathBuf>,
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Log rendering.
    pub log_format: LogFormat,
}

impl Default for LasflowConfig {
    fn default() -> Self {
        Self {
            install_root: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl LasflowConfig {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for an unknown log format.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, treating empty values as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for an unknown log format.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            install_root: get(ENV_LASTOOLS_HOME).map(PathBuf::from),
            log_filter: get(ENV_LOG).unwrap_or(defaults.log_filter),
            log_format: get(ENV_LOG_FORMAT)
                .map(|value| value.parse::<LogFormat>())
                .transpose()?
                .unwrap_or(defaults.log_format),
        })
    }

    /// Sets the installation root.
    #[must_use]
    pub fn with_install_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.install_root = Some(root.into());
        self
    }

    /// Sets the log filter directive.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Sets the log format.
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// The configured installation root, or the one the running binary lives in.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the binary location cannot be determined.
    pub fn resolve_install_root(&self) -> io::Result<PathBuf> {
        if let Some(root) = &self.install_root {
            return Ok(root.clone());
        }
        let exe = std::env::current_exe()?;
        install_root_of(&exe).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("cannot derive a LAStools root from {}", exe.display()),
            )
        })
    }
}

/// The installation root for a binary at `<root>/bin/<name>`.
#[must_use]
pub fn install_root_of(exe: &Path) -> Option<PathBuf> {
    exe.parent()?.parent().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LasflowConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LasflowConfig::default());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_environment_values() {
        let config = LasflowConfig::from_lookup(lookup(&[
            (ENV_LASTOOLS_HOME, "/opt/lastools"),
            (ENV_LOG, "lasflow=debug"),
            (ENV_LOG_FORMAT, "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.install_root, Some(PathBuf::from("/opt/lastools")));
        assert_eq!(config.log_filter, "lasflow=debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = LasflowConfig::from_lookup(lookup(&[(ENV_LASTOOLS_HOME, " "), (ENV_LOG, "")])).unwrap();
        assert_eq!(config.install_root, None);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_unknown_log_format() {
        let err = LasflowConfig::from_lookup(lookup(&[(ENV_LOG_FORMAT, "xml")])).unwrap_err();
        assert_eq!(err.code(), "CONFIG-SETTING");
        assert_eq!(err.to_string(), "Invalid value 'xml' for LASFLOW_LOG_FORMAT");
    }

    #[test]
    fn test_install_root_of_binary() {
        let exe = Path::new("/opt/lastools/bin/lasflow");
        assert_eq!(install_root_of(exe), Some(PathBuf::from("/opt/lastools")));
        assert_eq!(install_root_of(Path::new("lasflow")), None);
        assert_eq!(install_root_of(Path::new("/")), None);
    }

    #[test]
    fn test_explicit_root_wins() {
        let config = LasflowConfig::default().with_install_root("/srv/lastools");
        assert_eq!(config.resolve_install_root().unwrap(), PathBuf::from("/srv/lastools"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = LasflowConfig::default().with_log_format(LogFormat::Json);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"json\""));

        let back: LasflowConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
