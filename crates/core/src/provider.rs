//! Pluggable block hashing
//!
//! [`BlockHasher`] is the single capability the chain depends on.
//! [`HashProvider`] selects between SHA-256 and CA-Hash once, at construction.

use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::achash::AcHasher;
use crate::automaton::Rule;
use crate::error::{Error, Result};
use crate::params::{DEFAULT_RULE, DEFAULT_STEPS};

/// Anything that can turn a block payload into a 64-character hex digest
pub trait BlockHasher: Send + Sync {
    fn hash(&self, payload: &[u8]) -> Result<String>;

    /// Short label for logs and reports
    fn name(&self) -> &'static str;
}

/// SHA-256 of `data` as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hash mode of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum HashMode {
    /// SHA-256
    Reference,
    /// CA-Hash with the given rule and generation count
    Cellular { rule: Rule, steps: usize },
}

impl HashMode {
    pub fn cellular(rule: u8, steps: usize) -> Self {
        Self::Cellular {
            rule: Rule::new(rule),
            steps,
        }
    }

    /// Reject parameters that cannot produce a meaningful digest
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Reference => Ok(()),
            Self::Cellular { steps: 0, .. } => Err(Error::InvalidSteps),
            Self::Cellular { .. } => Ok(()),
        }
    }
}

impl Default for HashMode {
    fn default() -> Self {
        Self::cellular(DEFAULT_RULE, DEFAULT_STEPS)
    }
}

/// Hasher built from a [`HashMode`]
///
/// The CA hasher keeps scratch buffers, so it sits behind a mutex to let a
/// shared provider be used through `&self`.
#[derive(Debug)]
pub enum HashProvider {
    Reference,
    Cellular(Mutex<AcHasher>),
}

impl HashProvider {
    pub fn new(mode: HashMode) -> Result<Self> {
        mode.validate()?;
        Ok(match mode {
            HashMode::Reference => Self::Reference,
            HashMode::Cellular { rule, steps } => {
                Self::Cellular(Mutex::new(AcHasher::new(rule, steps)))
            }
        })
    }

    pub fn reference() -> Self {
        Self::Reference
    }

    pub fn cellular(rule: Rule, steps: usize) -> Result<Self> {
        Self::new(HashMode::Cellular { rule, steps })
    }

    pub fn mode(&self) -> HashMode {
        match self {
            Self::Reference => HashMode::Reference,
            Self::Cellular(hasher) => {
                let hasher = hasher.lock().unwrap_or_else(|e| e.into_inner());
                HashMode::Cellular {
                    rule: hasher.rule(),
                    steps: hasher.steps(),
                }
            }
        }
    }
}

impl Default for HashProvider {
    fn default() -> Self {
        Self::Cellular(Mutex::new(AcHasher::default()))
    }
}

impl Clone for HashProvider {
    fn clone(&self) -> Self {
        match self {
            Self::Reference => Self::Reference,
            Self::Cellular(hasher) => {
                let hasher = hasher.lock().unwrap_or_else(|e| e.into_inner());
                Self::Cellular(Mutex::new(hasher.clone()))
            }
        }
    }
}

impl BlockHasher for HashProvider {
    fn hash(&self, payload: &[u8]) -> Result<String> {
        match self {
            Self::Reference => Ok(sha256_hex(payload)),
            Self::Cellular(hasher) => hasher
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .hash(payload),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Reference => "sha256",
            Self::Cellular(_) => "ca-hash",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achash::ac_hash;

    #[test]
    fn test_reference_is_sha256() {
        let provider = HashProvider::reference();
        assert_eq!(
            provider.hash(b"abc").unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(provider.name(), "sha256");
    }

    #[test]
    fn test_cellular_matches_ac_hash() {
        let provider = HashProvider::cellular(Rule::new(30), 64).unwrap();
        assert_eq!(
            provider.hash(b"payload").unwrap(),
            ac_hash(b"payload", Rule::new(30), 64).unwrap()
        );
        assert_eq!(provider.mode(), HashMode::cellular(30, 64));
    }

    #[test]
    fn test_zero_steps_rejected() {
        assert_eq!(
            HashProvider::cellular(Rule::new(30), 0).unwrap_err(),
            Error::InvalidSteps
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_mode_serde() {
        let mode: HashMode =
            serde_json::from_str(r#"{"mode":"cellular","rule":90,"steps":16}"#).unwrap();
        assert_eq!(mode, HashMode::cellular(90, 16));

        let mode: HashMode = serde_json::from_str(r#"{"mode":"reference"}"#).unwrap();
        assert_eq!(mode, HashMode::Reference);

        assert!(
            serde_json::from_str::<HashMode>(r#"{"mode":"cellular","rule":300,"steps":16}"#)
                .is_err()
        );
    }
}
