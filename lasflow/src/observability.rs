//! Diagnostic logging setup.
//!
//! Logs go to stderr. Stdout belongs to the host message channel, which the
//! [`ConsoleReporter`](crate::reporter::ConsoleReporter) writes to. Colour
//! codes are only written when stderr is a terminal.

use crate::config::{LasflowConfig, LogFormat, ENV_LOG};
use crate::errors::ConfigError;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Parses the configured filter directive.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSetting`] if the directive does not parse.
pub fn env_filter(config: &LasflowConfig) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_new(&config.log_filter).map_err(|_| ConfigError::InvalidSetting {
        name: ENV_LOG,
        value: config.log_filter.clone(),
    })
}

/// Installs the global `tracing` subscriber.
///
/// Returns `false` if a subscriber was already installed, in which case it
/// is left in place.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSetting`] for a bad filter directive.
pub fn init_tracing(config: &LasflowConfig) -> Result<bool, ConfigError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal());

    let installed = match config.log_format {
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    Ok(installed.is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        let config = LasflowConfig::default().with_log_filter("lasflow=debug,warn");
        assert!(env_filter(&config).is_ok());

        let config = LasflowConfig::default().with_log_filter("lasflow=loud");
        let err = env_filter(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { name: ENV_LOG, .. }));
    }

    #[test]
    fn test_second_init_keeps_first_subscriber() {
        let config = LasflowConfig::default().with_log_format(LogFormat::Json);
        let _ = init_tracing(&config).unwrap();
        assert!(!init_tracing(&config).unwrap());
    }
}
