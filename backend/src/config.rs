//! Configuration management for the JalSarthi allocation server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with JALSARTHI_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    AutoAssignOptions, DEFAULT_MAX_NEW_ASSIGNMENTS, DEFAULT_MIN_STRESS_SCORE, DEFAULT_RECOMMENDATION_LIMIT,
};

pub const DEFAULT_OPTIMIZER_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_OPTIMIZER_MODEL: &str = "llama-3.3-70b-versatile";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// `pretty` or `json`
    pub log_format: String,

    pub server: ServerConfig,

    /// Dispatch planning defaults
    pub allocation: AllocationConfig,

    pub forecast: ForecastConfig,

    /// External plan generator
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AllocationConfig {
    /// Villages below this score are not auto-assigned
    pub min_stress_score: u32,

    /// Cap on assignments created per planning run
    pub max_new_assignments: usize,

    /// Recommendations returned per village
    pub recommendation_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Days of daily records summed into recent rainfall on refresh
    pub refresh_window_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OptimizerConfig {
    /// OpenAI-compatible chat completions URL
    pub api_endpoint: String,

    /// Absent disables the generator
    pub api_key: Option<String>,

    pub model: String,

    pub temperature: f32,

    pub max_tokens: u32,

    /// Only villages at or above this score are sent to the generator
    pub candidate_min_stress: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("JALSARTHI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("log_format", "pretty")?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("allocation.min_stress_score", DEFAULT_MIN_STRESS_SCORE as i64)?
            .set_default("allocation.max_new_assignments", DEFAULT_MAX_NEW_ASSIGNMENTS as i64)?
            .set_default("allocation.recommendation_limit", DEFAULT_RECOMMENDATION_LIMIT as i64)?
            .set_default("forecast.refresh_window_days", 30)?
            .set_default("optimizer.api_endpoint", DEFAULT_OPTIMIZER_ENDPOINT)?
            .set_default("optimizer.model", DEFAULT_OPTIMIZER_MODEL)?
            .set_default("optimizer.temperature", 0.2)?
            .set_default("optimizer.max_tokens", 4000)?
            .set_default("optimizer.candidate_min_stress", 50)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (JALSARTHI__ prefix)
            .add_source(
                Environment::with_prefix("JALSARTHI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = config.try_deserialize()?;

        // Fall back to a bare GROQ_API_KEY
        if config.optimizer.api_key.is_none() {
            config.optimizer.api_key = std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());
        }

        Ok(config)
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl AllocationConfig {
    /// Planner options, with per-request overrides taking precedence
    pub fn auto_assign_options(&self, min_stress_score: Option<u32>, max_dispatches: Option<usize>) -> AutoAssignOptions {
        AutoAssignOptions {
            min_stress_score: min_stress_score.unwrap_or(self.min_stress_score),
            max_new_assignments: max_dispatches.unwrap_or(self.max_new_assignments),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_format: "pretty".to_string(),
            server: ServerConfig::default(),
            allocation: AllocationConfig::default(),
            forecast: ForecastConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            min_stress_score: DEFAULT_MIN_STRESS_SCORE,
            max_new_assignments: DEFAULT_MAX_NEW_ASSIGNMENTS,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { refresh_window_days: 30 }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_OPTIMIZER_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_OPTIMIZER_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 4000,
            candidate_min_stress: 50,
        }
    }
}
