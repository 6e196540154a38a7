//! Run registry and telemetry channel configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct RunsConfig {
    /// Maximum runs retained; the oldest are evicted first
    #[serde(default = "default_registry_capacity")]
    pub registry_capacity: usize,

    /// Characters of the response kept on a closed run
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Events buffered per live feed subscriber
    #[serde(default = "default_channel_capacity")]
    pub telemetry_channel_capacity: usize,
}

impl RunsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.registry_capacity == 0 {
            return Err(ValidationError::InvalidCapacity("registry_capacity"));
        }
        if self.telemetry_channel_capacity == 0 {
            return Err(ValidationError::InvalidCapacity("telemetry_channel_capacity"));
        }
        Ok(())
    }
}

impl Default for RunsConfig {
    fn default() -> Self {
        Self {
            registry_capacity: default_registry_capacity(),
            preview_chars: default_preview_chars(),
            telemetry_channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_registry_capacity() -> usize {
    500
}

fn default_preview_chars() -> usize {
    400
}

fn default_channel_capacity() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_config_defaults() {
        let config = RunsConfig::default();
        assert_eq!(config.registry_capacity, 500);
        assert_eq!(config.preview_chars, 400);
        assert_eq!(config.telemetry_channel_capacity, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = RunsConfig {
            registry_capacity: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidCapacity("registry_capacity"))
        );
    }
}
