//! Configuration schema types.
//!
//! Every section and key is optional; an empty document (or no file at all)
//! yields [`FarthestConfig::default`].

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bridge::DEFAULT_MAX_MESSAGE_SIZE;
use crate::error::ConfigError;
use crate::game::{Locale, MessageOverrides, Messages};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FarthestConfig {
    /// Session timing and language
    pub session: SessionSettings,

    /// Per-line overrides of the locale catalog
    pub messages: MessageOverrides,

    /// Stdio bridge limits
    pub bridge: BridgeSettings,

    /// Event log and metrics
    pub observability: ObservabilitySettings,
}

impl FarthestConfig {
    /// Message catalog for the configured locale with overrides applied.
    #[must_use]
    pub fn messages(&self) -> Messages {
        Messages::for_locale(self.session.locale).with_overrides(&self.messages)
    }
}

/// `session:` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSettings {
    /// Length of one game second, as a humantime string (`1s`, `250ms`)
    pub tick_interval: String,

    /// Built-in catalog to start from
    pub locale: Locale,

    /// Dimension commands and respawn points refer to
    pub dimension: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval: "1s".to_string(),
            locale: Locale::default(),
            dimension: "overworld".to_string(),
        }
    }
}

impl SessionSettings {
    /// Parses [`Self::tick_interval`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the string is not a duration.
    pub fn tick_interval(&self) -> Result<Duration, ConfigError> {
        parse_duration("session.tick_interval", &self.tick_interval)
    }
}

/// `bridge:` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeSettings {
    /// Longest accepted inbound line in bytes
    pub max_message_size: usize,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

/// `observability:` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObservabilitySettings {
    /// JSONL event log path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_file: Option<PathBuf>,

    /// Prometheus listener port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

/// Parses a humantime duration string, naming `field` on failure.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if `value` is not a duration.
pub fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: format!("a duration such as 1s or 250ms ({e})"),
    })
}
