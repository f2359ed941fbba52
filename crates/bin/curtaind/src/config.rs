//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `curtain.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use curtain_app::dispatcher::DispatchConfig;
use curtain_app::session::SessionConfig;
use curtain_domain::alarm::AlarmTime;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Wireless link settings.
    pub ble: BleConfig,
    /// Alarm settings.
    pub alarm: AlarmConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Wireless link configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BleConfig {
    /// Peripherals whose advertised name contains this tag are connected
    /// to automatically.
    pub auto_connect_tag: String,
    /// Duration of one discovery pass, in seconds.
    pub scan_window_secs: u64,
    /// Back-off before re-scanning after a lost link, in seconds.
    pub reconnect_delay_secs: u64,
    /// Pause between becoming ready to send and the first write, in
    /// milliseconds.
    pub settle_ms: u64,
    /// Pause between consecutive writes of one burst, in milliseconds.
    pub spacing_ms: u64,
}

/// Alarm configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Target time as `HH:MM`, armed at startup when set.
    pub time: Option<String>,
}

impl Config {
    /// Load configuration from `curtain.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if a
    /// configured value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("curtain.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CURTAIN_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("CURTAIN_TAG") {
            self.ble.auto_connect_tag = val;
        }
        if let Ok(val) = std::env::var("CURTAIN_ALARM") {
            self.alarm.time = Some(val);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ble.auto_connect_tag.is_empty() {
            return Err(ConfigError::Validation(
                "auto_connect_tag must not be empty".to_owned(),
            ));
        }
        if self.ble.scan_window_secs == 0 {
            return Err(ConfigError::Validation(
                "scan_window_secs must be non-zero".to_owned(),
            ));
        }
        self.alarm_time().map(|_| ())
    }

    /// The alarm target parsed from the `[alarm]` section, when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the configured time is not
    /// a valid `HH:MM`.
    pub fn alarm_time(&self) -> Result<Option<AlarmTime>, ConfigError> {
        self.alarm
            .time
            .as_deref()
            .map(|raw| {
                AlarmTime::from_str(raw)
                    .map_err(|_| ConfigError::Validation(format!("invalid alarm time {raw:?}")))
            })
            .transpose()
    }

    /// The session knobs derived from the `[ble]` section.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            scan_window: Duration::from_secs(self.ble.scan_window_secs),
            reconnect_delay: Duration::from_secs(self.ble.reconnect_delay_secs),
            auto_connect_tag: self.ble.auto_connect_tag.clone(),
        }
    }

    /// The dispatch knobs derived from the `[ble]` section.
    #[must_use]
    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            settle: Duration::from_millis(self.ble.settle_ms),
            spacing: Duration::from_millis(self.ble.spacing_ms),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "curtaind=info,curtain=info".to_owned(),
        }
    }
}

impl Default for BleConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        let dispatch = DispatchConfig::default();
        Self {
            auto_connect_tag: session.auto_connect_tag,
            scan_window_secs: session.scan_window.as_secs(),
            reconnect_delay_secs: session.reconnect_delay.as_secs(),
            settle_ms: u64::try_from(dispatch.settle.as_millis()).unwrap_or(500),
            spacing_ms: u64::try_from(dispatch.spacing.as_millis()).unwrap_or(300),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.ble.auto_connect_tag, "HC-08");
        assert_eq!(config.ble.scan_window_secs, 10);
        assert_eq!(config.ble.reconnect_delay_secs, 3);
        assert_eq!(config.ble.settle_ms, 500);
        assert_eq!(config.ble.spacing_ms, 300);
        assert!(config.alarm.time.is_none());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.ble.auto_connect_tag, "HC-08");
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [logging]
            filter = 'debug'

            [ble]
            auto_connect_tag = 'HM-10'
            scan_window_secs = 5
            reconnect_delay_secs = 1
            settle_ms = 200
            spacing_ms = 100

            [alarm]
            time = '06:45'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.ble.auto_connect_tag, "HM-10");
        assert_eq!(config.ble.scan_window_secs, 5);
        assert_eq!(
            config.alarm_time().unwrap(),
            Some(AlarmTime::new(6, 45).unwrap())
        );
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [ble]
            scan_window_secs = 20
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.ble.scan_window_secs, 20);
        assert_eq!(config.ble.auto_connect_tag, "HC-08");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.ble.auto_connect_tag, "HC-08");
    }

    #[test]
    fn should_reject_empty_auto_connect_tag() {
        let mut config = Config::default();
        config.ble.auto_connect_tag = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_scan_window() {
        let mut config = Config::default();
        config.ble.scan_window_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_malformed_alarm_time() {
        let mut config = Config::default();
        config.alarm.time = Some("25:99".to_owned());
        assert!(config.validate().is_err());
        config.alarm.time = Some("seven".to_owned());
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_missing_alarm_time() {
        let config = Config::default();
        assert_eq!(config.alarm_time().unwrap(), None);
    }

    #[test]
    fn should_derive_session_and_dispatch_configs() {
        let config = Config::default();
        let session = config.session_config();
        assert_eq!(session.scan_window, Duration::from_secs(10));
        assert_eq!(session.reconnect_delay, Duration::from_secs(3));
        let dispatch = config.dispatch_config();
        assert_eq!(dispatch.settle, Duration::from_millis(500));
        assert_eq!(dispatch.spacing, Duration::from_millis(300));
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
