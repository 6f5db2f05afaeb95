//! Proof-of-stake validator draw
//!
//! A validator is picked with probability proportional to its stake. The
//! random source is always passed in, so a seeded generator reproduces the
//! same sequence of picks.

use std::collections::BTreeMap;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

/// Validator name to stake weight, ordered by name
pub type StakeTable = BTreeMap<String, u64>;

/// Draw a validator with probability `stake / total_stake`
///
/// Returns `None` when the table is empty, holds no stake, or its total
/// stake does not fit in a `u64`.
pub fn select_validator<'a, R: Rng>(table: &'a StakeTable, rng: &mut R) -> Option<&'a str> {
    let total = table
        .values()
        .try_fold(0u64, |total, &stake| total.checked_add(stake))?;
    if total == 0 {
        return None;
    }

    let mut ticket = rng.gen_range(0..total);
    for (name, &stake) in table {
        if ticket < stake {
            return Some(name.as_str());
        }
        ticket -= stake;
    }
    None
}

/// A `name=weight` entry of a stake table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeEntry {
    pub name: String,
    pub stake: u64,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("expected name=weight with a positive weight, got {0:?}")]
pub struct StakeParseError(String);

impl FromStr for StakeEntry {
    type Err = StakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, stake) = s
            .split_once('=')
            .ok_or_else(|| StakeParseError(s.to_string()))?;
        let stake = stake
            .trim()
            .parse::<u64>()
            .map_err(|_| StakeParseError(s.to_string()))?;
        if name.is_empty() || stake == 0 {
            return Err(StakeParseError(s.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            stake,
        })
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("total stake exceeds {}", u64::MAX)]
pub struct StakeOverflow;

/// Build a table from parsed entries; repeated names add up
///
/// Fails when the total stake would not fit in a `u64`.
pub fn stake_table(
    entries: impl IntoIterator<Item = StakeEntry>,
) -> Result<StakeTable, StakeOverflow> {
    let mut table = StakeTable::new();
    let mut total = 0u64;
    for entry in entries {
        total = total.checked_add(entry.stake).ok_or(StakeOverflow)?;
        *table.entry(entry.name).or_default() += entry.stake;
    }
    Ok(table)
}
