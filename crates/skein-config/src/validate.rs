//! Field checks for a resolved configuration.

use crate::error::{ConfigError, ConfigResult};
use crate::model::ClientConfig;

/// Check every field of `config`.
///
/// # Errors
///
/// Returns the first [`ConfigError::InvalidField`] encountered.
pub fn validate(config: &ClientConfig) -> ConfigResult<()> {
    let daemon = &config.daemon;
    if daemon.host.trim().is_empty() {
        return Err(invalid("daemon", "host", &daemon.host, "must not be empty"));
    }
    if daemon.port == 0 {
        return Err(invalid(
            "daemon",
            "port",
            &daemon.port,
            "must be between 1 and 65535",
        ));
    }
    if !daemon.rpc_path.starts_with('/') {
        return Err(invalid(
            "daemon",
            "rpc_path",
            &daemon.rpc_path,
            "must start with '/'",
        ));
    }
    ensure_positive("daemon", "timeout_secs", daemon.timeout_secs)?;
    ensure_positive(
        "refresh",
        "poll_interval_secs",
        config.refresh.poll_interval_secs,
    )?;
    ensure_positive(
        "refresh",
        "peers_interval_secs",
        config.refresh.peers_interval_secs,
    )?;
    if config.logging.level.trim().is_empty() {
        return Err(invalid(
            "logging",
            "level",
            &config.logging.level,
            "must not be empty",
        ));
    }
    daemon.rpc_url()?;
    Ok(())
}

fn ensure_positive(section: &'static str, field: &'static str, value: u64) -> ConfigResult<()> {
    if value == 0 {
        return Err(invalid(section, field, &value, "must be positive"));
    }
    Ok(())
}

fn invalid(
    section: &'static str,
    field: &'static str,
    value: &impl ToString,
    reason: &'static str,
) -> ConfigError {
    ConfigError::InvalidField {
        section,
        field,
        value: Some(value.to_string()),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_field(config: &ClientConfig) -> Option<&'static str> {
        match validate(config) {
            Err(ConfigError::InvalidField { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn each_bad_field_is_named() {
        let mut config = ClientConfig::default();
        config.daemon.host = "  ".into();
        assert_eq!(rejected_field(&config), Some("host"));

        let mut config = ClientConfig::default();
        config.daemon.port = 0;
        assert_eq!(rejected_field(&config), Some("port"));

        let mut config = ClientConfig::default();
        config.daemon.rpc_path = "transmission/rpc".into();
        assert_eq!(rejected_field(&config), Some("rpc_path"));

        let mut config = ClientConfig::default();
        config.refresh.poll_interval_secs = 0;
        assert_eq!(rejected_field(&config), Some("poll_interval_secs"));

        let mut config = ClientConfig::default();
        config.refresh.peers_interval_secs = 0;
        assert_eq!(rejected_field(&config), Some("peers_interval_secs"));

        let mut config = ClientConfig::default();
        config.daemon.timeout_secs = 0;
        assert_eq!(rejected_field(&config), Some("timeout_secs"));
    }
}
