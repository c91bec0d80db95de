//! Probe configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default slow-render threshold: one frame at 60fps.
pub const DEFAULT_SLOW_THRESHOLD_MS: f64 = 16.0;

/// Resolve the default enablement from the build mode.
///
/// Observation defaults on in debug builds when the `instrumentation`
/// feature is enabled; release builds must opt in explicitly. Consulted only
/// when a configuration is constructed, never again after mount.
pub fn default_enabled() -> bool {
    cfg!(feature = "instrumentation") && cfg!(debug_assertions)
}

fn default_log_slow_renders() -> bool {
    true
}

fn default_slow_threshold_ms() -> f64 {
    DEFAULT_SLOW_THRESHOLD_MS
}

/// Configuration for a mounted [`RenderProbe`](crate::RenderProbe).
///
/// Fixed for the lifetime of the mount; changing configuration means
/// remounting the probe with new inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    /// Identifies the observed subtree
    pub id: String,
    /// Whether the probe observes at all; off means passthrough
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Emit a grouped diagnostic when a cycle exceeds the threshold
    #[serde(default = "default_log_slow_renders")]
    pub log_slow_renders: bool,
    /// Slow-render threshold in milliseconds
    #[serde(default = "default_slow_threshold_ms")]
    pub slow_threshold_ms: f64,
}

impl ProbeConfig {
    /// Create a configuration for the given subtree with default settings.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: default_enabled(),
            log_slow_renders: true,
            slow_threshold_ms: DEFAULT_SLOW_THRESHOLD_MS,
        }
    }

    /// Builder method to force enablement on or off.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method to toggle slow-render diagnostics.
    pub fn with_log_slow_renders(mut self, log: bool) -> Self {
        self.log_slow_renders = log;
        self
    }

    /// Builder method to set the slow-render threshold.
    pub fn with_slow_threshold(mut self, ms: f64) -> Self {
        self.slow_threshold_ms = ms;
        self
    }

    /// Parse a configuration from JSON, applying defaults for absent fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this configuration to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.is_empty() {
            return Err(ConfigError::EmptyId);
        }
        if !self.slow_threshold_ms.is_finite() || self.slow_threshold_ms < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.slow_threshold_ms));
        }
        Ok(())
    }
}

/// Errors from parsing or validating a probe configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be deserialized
    #[error("invalid probe configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The subtree id was empty
    #[error("probe id must not be empty")]
    EmptyId,

    /// The threshold was negative or not finite
    #[error("slow threshold must be a finite non-negative number, got {0}")]
    InvalidThreshold(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::new("Sidebar");
        assert_eq!(config.id, "Sidebar");
        assert!(config.log_slow_renders);
        assert_eq!(config.slow_threshold_ms, 16.0);
    }

    #[test]
    fn test_builder() {
        let config = ProbeConfig::new("Sidebar")
            .with_enabled(true)
            .with_log_slow_renders(false)
            .with_slow_threshold(8.0);

        assert!(config.enabled);
        assert!(!config.log_slow_renders);
        assert_eq!(config.slow_threshold_ms, 8.0);
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let config = ProbeConfig::from_json(r#"{"id":"Sidebar","enabled":true}"#).unwrap();
        assert_eq!(config.id, "Sidebar");
        assert!(config.enabled);
        assert!(config.log_slow_renders);
        assert_eq!(config.slow_threshold_ms, 16.0);
    }

    #[test]
    fn test_from_json_camel_case() {
        let config = ProbeConfig::from_json(
            r#"{"id":"Editor","enabled":false,"logSlowRenders":false,"slowThresholdMs":33.0}"#,
        )
        .unwrap();
        assert!(!config.enabled);
        assert!(!config.log_slow_renders);
        assert_eq!(config.slow_threshold_ms, 33.0);
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = ProbeConfig::from_json(r#"{"id":""}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyId));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = ProbeConfig::new("Sidebar").with_slow_threshold(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = ProbeConfig::new("Sidebar")
            .with_enabled(true)
            .with_slow_threshold(8.0);
        let json = config.to_json().unwrap();
        assert!(json.contains("slowThresholdMs"));

        let parsed = ProbeConfig::from_json(&json).unwrap();
        assert_eq!(parsed.id, config.id);
        assert_eq!(parsed.slow_threshold_ms, config.slow_threshold_ms);
    }
}
