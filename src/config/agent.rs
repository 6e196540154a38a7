//! Agent runtime configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::AssistantSettings;

/// Agent runtime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Which runtime answers queries
    #[serde(default)]
    pub provider: AgentProvider,

    /// API key for the OpenAI-compatible endpoint
    pub api_key: Option<SecretString>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Prior turns sent with each query
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Turns retained in the conversation history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    #[serde(default = "default_frago_max_turns")]
    pub frago_max_turns: u32,
}

/// Agent runtime type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentProvider {
    /// Offline keyword-scripted runtime.
    #[default]
    Scripted,
    #[serde(rename = "openai")]
    OpenAI,
}

impl AgentConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Orchestration settings derived from this configuration
    pub fn assistant_settings(&self) -> AssistantSettings {
        AssistantSettings {
            history_limit: self.history_limit,
            history_capacity: self.history_capacity,
            max_turns: self.max_turns,
            frago_max_turns: self.frago_max_turns,
        }
    }

    /// Validate agent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == AgentProvider::OpenAI && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("AGENT__API_KEY"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.history_capacity < self.history_limit {
            return Err(ValidationError::InvalidCapacity("history_capacity"));
        }
        if self.max_turns == 0 {
            return Err(ValidationError::InvalidTurnBudget("max_turns"));
        }
        if self.frago_max_turns == 0 {
            return Err(ValidationError::InvalidTurnBudget("frago_max_turns"));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: AgentProvider::default(),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            history_limit: default_history_limit(),
            history_capacity: default_history_capacity(),
            max_turns: default_max_turns(),
            frago_max_turns: default_frago_max_turns(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    2
}

fn default_history_limit() -> usize {
    6
}

fn default_history_capacity() -> usize {
    200
}

fn default_max_turns() -> u32 {
    20
}

fn default_frago_max_turns() -> u32 {
    25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.provider, AgentProvider::Scripted);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.assistant_settings(), AssistantSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_openai_requires_key() {
        let config = AgentConfig {
            provider: AgentProvider::OpenAI,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AGENT__API_KEY"))
        );

        let config = AgentConfig {
            provider: AgentProvider::OpenAI,
            api_key: Some(SecretString::new(String::new())),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AgentConfig {
            provider: AgentProvider::OpenAI,
            api_key: Some(SecretString::new("sk-xxx".to_string())),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_must_be_http() {
        let config = AgentConfig {
            base_url: "api.openai.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBaseUrl));
    }

    #[test]
    fn test_zero_turn_budgets_rejected() {
        let config = AgentConfig {
            max_turns: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTurnBudget("max_turns"))
        );

        let config = AgentConfig {
            frago_max_turns: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_history_capacity_must_cover_the_window() {
        let config = AgentConfig {
            history_limit: 10,
            history_capacity: 4,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidCapacity("history_capacity"))
        );
        assert_eq!(AgentConfig::default().assistant_settings().history_capacity, 200);
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let config = AgentConfig {
            api_key: Some(SecretString::new("sk-very-secret".to_string())),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }
}
