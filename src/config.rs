//! Protocol configuration
//!
//! Loaded from JSON or taken from `Default`; the CLI layers its flags on top.

use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the Verifier draws a challenge pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeSampling {
    /// Any (u, v) in [0, n)², edges or not. Non-edges make the round void.
    AnyPair,
    /// Uniformly from the graph's edge set
    EdgesOnly,
}

/// Settings for one proof run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Independent rounds, each with a fresh permutation and commitments
    pub rounds: u32,
    /// Number of colors the Prover claims suffice
    pub colors: u8,
    pub sampling: ChallengeSampling,
    /// Commit to the witness before each challenge
    pub commitments: bool,
    /// Buffer size of each direction's channel
    pub channel_capacity: usize,
    /// Fixed RNG seed for reproducible runs; entropy when unset
    pub seed: Option<u64>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            rounds: 1,
            colors: 3,
            sampling: ChallengeSampling::AnyPair,
            commitments: true,
            channel_capacity: 10,
            seed: None,
        }
    }
}

impl ProtocolConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        info!("Loaded protocol config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::Invalid("rounds must be at least 1".into()));
        }
        if self.colors == 0 {
            return Err(ConfigError::Invalid("colors must be at least 1".into()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "rounds={} | colors={} | sampling={:?} | commitments={} | seed={}",
            self.rounds,
            self.colors,
            self.sampling,
            self.commitments,
            self.seed.map_or_else(|| "entropy".to_string(), |s| s.to_string())
        )
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
