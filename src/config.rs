//! Simulator configuration
//!
//! Loaded from a JSON file and overridden by command-line flags:
//!
//! ```json
//! {
//!   "hash": { "mode": "cellular", "rule": 30, "steps": 128 },
//!   "difficulty": 4,
//!   "seed": 42,
//!   "threads": 1,
//!   "max_iterations": null
//! }
//! ```

use std::fs;
use std::path::Path;

use cahash_core::{HashMode, HashProvider, DEFAULT_SEED, DIGEST_HEX_LEN};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::Blockchain;
use crate::miner::{Miner, StopPolicy};

/// Default number of leading zero hex digits
pub const DEFAULT_DIFFICULTY: usize = 4;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid hash parameters: {0}")]
    Hash(#[from] cahash_core::Error),

    #[error("difficulty {0} exceeds the 64-digit digest")]
    Difficulty(usize),
}

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Block hash mode
    pub hash: HashMode,
    /// Required leading zero hex digits
    pub difficulty: usize,
    /// Seed for the statistical harness and validator draws
    pub seed: u64,
    /// Parallel mining workers (0 or 1 mines sequentially)
    pub threads: usize,
    /// Cap on nonce increments per block (unbounded when absent)
    pub max_iterations: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hash: HashMode::default(),
            difficulty: DEFAULT_DIFFICULTY,
            seed: DEFAULT_SEED,
            threads: 1,
            max_iterations: None,
        }
    }
}

impl SimConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hash.validate()?;
        if self.difficulty > DIGEST_HEX_LEN {
            return Err(ConfigError::Difficulty(self.difficulty));
        }
        Ok(())
    }

    pub fn provider(&self) -> Result<HashProvider, ConfigError> {
        Ok(HashProvider::new(self.hash)?)
    }

    pub fn stop_policy(&self) -> StopPolicy {
        match self.max_iterations {
            Some(limit) => StopPolicy::unbounded().with_max_iterations(limit),
            None => StopPolicy::unbounded(),
        }
    }

    pub fn miner(&self) -> Result<Miner<HashProvider>, ConfigError> {
        Ok(Miner::new(self.provider()?)
            .with_policy(self.stop_policy())
            .with_threads(self.threads))
    }

    /// Empty chain using this config's hasher, miner settings and difficulty
    pub fn chain(&self) -> Result<Blockchain<HashProvider>, ConfigError> {
        self.validate()?;
        Ok(Blockchain::with_miner(self.miner()?, self.difficulty))
    }
}
