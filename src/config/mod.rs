//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `MCOA` prefix and
//! double underscores between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use mcoa::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod agent;
mod error;
mod runs;
mod server;

pub use agent::{AgentConfig, AgentProvider};
pub use error::{ConfigError, ValidationError};
pub use runs::RunsConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

use crate::application::ServiceOptions;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// offline configuration with the scripted agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Agent runtime configuration (provider, model, turn budgets)
    #[serde(default)]
    pub agent: AgentConfig,

    /// Run registry and telemetry channel sizing
    #[serde(default)]
    pub runs: RunsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MCOA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `MCOA__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MCOA__AGENT__PROVIDER=openai` -> `agent.provider = openai`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MCOA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.agent.validate()?;
        self.runs.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Options for building the assistant's services
    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            settings: self.agent.assistant_settings(),
            registry_capacity: self.runs.registry_capacity,
            preview_chars: self.runs.preview_chars,
            tool_seed: None,
        }
    }
}
