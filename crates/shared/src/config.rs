//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Planning engine configuration.
    #[serde(default)]
    pub planning: PlanningConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Planning engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanningConfig {
    /// Currency new budget versions are planned in.
    #[serde(default = "default_currency")]
    pub currency: Currency,
    /// Absolute variance percent above which a line is flagged as a warning.
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: Decimal,
    /// Absolute variance percent above which a line is flagged as critical.
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: Decimal,
    /// Maximum number of cached baseline summaries.
    #[serde(default = "default_baseline_cache_capacity")]
    pub baseline_cache_capacity: u64,
    /// Time-to-live of a cached baseline summary, in seconds.
    #[serde(default = "default_baseline_cache_ttl")]
    pub baseline_cache_ttl_secs: u64,
    /// Load the demo category tree and actuals on startup.
    #[serde(default)]
    pub seed_demo_data: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            warning_threshold: default_warning_threshold(),
            critical_threshold: default_critical_threshold(),
            baseline_cache_capacity: default_baseline_cache_capacity(),
            baseline_cache_ttl_secs: default_baseline_cache_ttl(),
            seed_demo_data: false,
        }
    }
}

fn default_currency() -> Currency {
    Currency::Usd
}

fn default_warning_threshold() -> Decimal {
    Decimal::from(5)
}

fn default_critical_threshold() -> Decimal {
    Decimal::from(10)
}

fn default_baseline_cache_capacity() -> u64 {
    1_000
}

fn default_baseline_cache_ttl() -> u64 {
    300 // 5 minutes
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUDGETWISE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
