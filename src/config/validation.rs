//! Configuration validation.
//!
//! Runs on the deserialized [`FarthestConfig`] and collects every issue
//! instead of stopping at the first.

use std::time::Duration;

use crate::config::schema::{FarthestConfig, parse_duration};
use crate::error::{Severity, ValidationIssue};
use crate::game::MessageOverrides;

/// Shortest accepted tick interval.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Longest accepted tick interval.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Smallest accepted bridge line limit.
pub const MIN_MESSAGE_SIZE: usize = 1024;

/// Largest accepted bridge line limit.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    pub fn validate(&mut self, config: &FarthestConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_session(config);
        self.validate_bridge(config);
        self.validate_observability(config);
        self.validate_messages(&config.messages);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_session(&mut self, config: &FarthestConfig) {
        let session = &config.session;
        match parse_duration("session.tick_interval", &session.tick_interval) {
            Ok(interval) if !(MIN_TICK_INTERVAL..=MAX_TICK_INTERVAL).contains(&interval) => {
                self.add_error(
                    "session.tick_interval",
                    &format!(
                        "Tick interval '{}' is out of range (10ms to 60s)",
                        session.tick_interval
                    ),
                );
            }
            Ok(interval) if interval != Duration::from_secs(1) => {
                self.add_warning(
                    "session.tick_interval",
                    "Tick interval differs from one second; on-screen seconds will not match wall time",
                );
            }
            Ok(_) => {}
            Err(e) => self.add_error("session.tick_interval", &e.to_string()),
        }

        if session.dimension.trim().is_empty() {
            self.add_error("session.dimension", "Dimension cannot be empty");
        } else if session.dimension.chars().any(char::is_whitespace) {
            self.add_error("session.dimension", "Dimension cannot contain whitespace");
        }
    }

    fn validate_bridge(&mut self, config: &FarthestConfig) {
        let size = config.bridge.max_message_size;
        if !(MIN_MESSAGE_SIZE..=MAX_MESSAGE_SIZE).contains(&size) {
            self.add_error(
                "bridge.max_message_size",
                &format!("Message size limit {size} is out of range (1024 to 67108864 bytes)"),
            );
        }
    }

    fn validate_observability(&mut self, config: &FarthestConfig) {
        if config.observability.metrics_port == Some(0) {
            self.add_error("observability.metrics_port", "Metrics port cannot be 0");
        }
    }

    /// Warns when an override drops a placeholder its line normally carries.
    fn validate_messages(&mut self, overrides: &MessageOverrides) {
        let checks: [(&str, &Option<String>, &[&str]); 4] = [
            ("messages.received", &overrides.received, &["{id}"]),
            ("messages.countdown", &overrides.countdown, &["{seconds}"]),
            (
                "messages.time_remaining",
                &overrides.time_remaining,
                &["{seconds}"],
            ),
            ("messages.winner", &overrides.winner, &["{name}", "{score}"]),
        ];
        for (path, value, placeholders) in checks {
            let Some(text) = value else { continue };
            for placeholder in placeholders {
                if !text.contains(placeholder) {
                    self.add_warning(
                        path,
                        &format!("Message does not use the {placeholder} placeholder"),
                    );
                }
            }
        }

        let fixed = [
            ("messages.round_start", &overrides.round_start),
            ("messages.one_minute_warning", &overrides.one_minute_warning),
            ("messages.round_end", &overrides.round_end),
            ("messages.objective_title", &overrides.objective_title),
        ];
        for (path, value) in fixed {
            if value.as_deref().is_some_and(|text| text.trim().is_empty()) {
                self.add_warning(path, "Message is empty");
            }
        }
    }

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(config: &FarthestConfig) -> ValidationResult {
        Validator::new().validate(config)
    }

    #[test]
    fn test_default_config_is_clean() {
        let result = validate(&FarthestConfig::default());
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FarthestConfig::default();
        config.session.tick_interval = "2m".to_string();
        config.session.dimension = String::new();
        config.bridge.max_message_size = 10;
        config.observability.metrics_port = Some(0);

        let result = validate(&config);
        assert!(result.has_errors());
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "session.tick_interval",
                "session.dimension",
                "bridge.max_message_size",
                "observability.metrics_port"
            ]
        );
    }

    #[test]
    fn test_unparseable_tick_interval() {
        let mut config = FarthestConfig::default();
        config.session.tick_interval = "fast".to_string();
        let result = validate(&config);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].severity, Severity::Error);
    }

    #[test]
    fn test_fast_ticks_warn() {
        let mut config = FarthestConfig::default();
        config.session.tick_interval = "100ms".to_string();
        let result = validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_missing_placeholder_warns() {
        let mut config = FarthestConfig::default();
        config.messages.winner = Some("We have a winner".to_string());
        config.messages.round_end = Some("  ".to_string());
        let result = validate(&config);
        assert!(result.is_valid());
        let paths: Vec<&str> = result.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["messages.winner", "messages.winner", "messages.round_end"]
        );
    }
}
