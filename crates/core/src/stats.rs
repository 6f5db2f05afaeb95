//! Statistical quality checks for CA-Hash
//!
//! Both measurements run the production [`AcHasher`], and the random messages
//! come from a generator seeded by the caller, so a given seed always
//! reproduces the same numbers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::achash::AcHasher;
use crate::automaton::Rule;
use crate::bits::{hamming_distance, hex_to_bits};
use crate::error::Result;
use crate::params::*;

/// Outcome of an avalanche run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvalancheReport {
    pub rule: Rule,
    pub steps: usize,
    pub trials: usize,
    /// Mean number of digest bits flipped by a one-bit input change, in `[0, 256]`
    pub mean_bit_difference: f64,
}

impl AvalancheReport {
    /// Mean flipped bits as a percentage of the digest width (ideal: 50%)
    pub fn percent(&self) -> f64 {
        self.mean_bit_difference / DIGEST_BITS as f64 * 100.0
    }
}

/// Measure the avalanche effect of CA-Hash
///
/// Draws [`AVALANCHE_TRIALS`] random 32-byte messages, flips the lowest bit of
/// the first byte in a copy, and averages the Hamming distance between the two
/// digests.
pub fn avalanche_test(rule: Rule, steps: usize, seed: u64) -> Result<AvalancheReport> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut hasher = AcHasher::new(rule, steps);
    let mut total = 0u64;

    for _ in 0..AVALANCHE_TRIALS {
        let mut message = [0u8; AVALANCHE_MESSAGE_LEN];
        rng.fill(&mut message[..]);
        let mut flipped = message;
        flipped[0] ^= 1;

        let h1 = hasher.hash(&message)?;
        let h2 = hasher.hash(&flipped)?;
        total += hamming_distance(&h1, &h2)? as u64;
    }

    Ok(AvalancheReport {
        rule,
        steps,
        trials: AVALANCHE_TRIALS,
        mean_bit_difference: total as f64 / AVALANCHE_TRIALS as f64,
    })
}

/// Percentage of set bits across the digests of `"msg0"` .. `"msg499"` (ideal: 50%)
pub fn bit_distribution_test(rule: Rule, steps: usize) -> Result<f64> {
    let mut hasher = AcHasher::new(rule, steps);
    let mut ones = 0u64;
    let mut total = 0u64;

    for i in 0..DISTRIBUTION_SAMPLES {
        let digest = hasher.hash(format!("msg{}", i).as_bytes())?;
        let bits = hex_to_bits(&digest)?;
        ones += bits.iter().filter(|&&b| b).count() as u64;
        total += bits.len() as u64;
    }

    Ok(100.0 * ones as f64 / total as f64)
}

/// Avalanche and distribution figures for one rule
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleQuality {
    pub avalanche: AvalancheReport,
    pub ones_percent: f64,
}

/// Run both measurements for each rule in `rules`
pub fn rule_survey(rules: &[Rule], steps: usize, seed: u64) -> Result<Vec<RuleQuality>> {
    rules
        .iter()
        .map(|&rule| {
            Ok(RuleQuality {
                avalanche: avalanche_test(rule, steps, seed)?,
                ones_percent: bit_distribution_test(rule, steps)?,
            })
        })
        .collect()
}
