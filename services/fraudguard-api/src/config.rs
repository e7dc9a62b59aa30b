use config::{ConfigError, Environment};
use risk_engine::{EngineConfig, JitterConfig, JitterMode, Thresholds};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: ScoringConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScoringConfig {
    pub medium_risk_threshold: f64,
    pub high_risk_threshold: f64,
    pub fraud_threshold: f64,
    /// One of `disabled`, `seeded`, `entropy`
    pub jitter_mode: String,
    pub jitter_seed: u64,
    pub jitter_amplitude: f64,
    pub max_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                workers: 4,
            },
            engine: ScoringConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            medium_risk_threshold: thresholds.medium,
            high_risk_threshold: thresholds.high,
            fraud_threshold: thresholds.fraud,
            jitter_mode: "disabled".to_string(),
            jitter_seed: 0,
            jitter_amplitude: risk_engine::jitter::DEFAULT_JITTER_AMPLITUDE,
            max_batch_size: 100,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let mut builder = config::Config::builder()
            // Server defaults
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("server.workers", defaults.server.workers as i64)?
            // Scoring defaults
            .set_default("engine.medium_risk_threshold", defaults.engine.medium_risk_threshold)?
            .set_default("engine.high_risk_threshold", defaults.engine.high_risk_threshold)?
            .set_default("engine.fraud_threshold", defaults.engine.fraud_threshold)?
            .set_default("engine.jitter_mode", defaults.engine.jitter_mode)?
            .set_default("engine.jitter_seed", defaults.engine.jitter_seed)?
            .set_default("engine.jitter_amplitude", defaults.engine.jitter_amplitude)?
            .set_default("engine.max_batch_size", defaults.engine.max_batch_size as i64)?;

        builder = builder.add_source(Environment::with_prefix("FRAUDGUARD").separator("__"));

        // Override from environment variables
        if let Ok(port) = env::var("SERVICE_PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }

        if self.server.workers == 0 {
            return Err("At least one worker is required".to_string());
        }

        if self.engine.max_batch_size == 0 {
            return Err("Max batch size must be at least 1".to_string());
        }

        self.engine_config()
            .and_then(|cfg| cfg.validate().map_err(|e| e.to_string()))
    }

    /// Scoring engine configuration derived from the `engine` section
    pub fn engine_config(&self) -> Result<EngineConfig, String> {
        let mode = match self.engine.jitter_mode.to_lowercase().as_str() {
            "disabled" | "off" | "none" => JitterMode::Disabled,
            "seeded" => JitterMode::Seeded(self.engine.jitter_seed),
            "entropy" | "random" => JitterMode::Entropy,
            other => return Err(format!("Unknown jitter mode: {}", other)),
        };

        Ok(EngineConfig {
            thresholds: Thresholds {
                medium: self.engine.medium_risk_threshold,
                high: self.engine.high_risk_threshold,
                fraud: self.engine.fraud_threshold,
            },
            jitter: JitterConfig {
                mode,
                amplitude: self.engine.jitter_amplitude,
            },
        })
    }
}
