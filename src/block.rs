//! Block structure and canonical payload
//!
//! A block's hash is computed over its payload string:
//!
//! ```text
//! {index}|{previous_hash}|{data}|{nonce}|{timestamp}
//! ```
//!
//! Field order and the `|` separator are fixed; verification recomputes this
//! exact string.

use serde::{Deserialize, Serialize};

use crate::merkle::{transactions_root, Transaction};

/// Previous-hash sentinel of the genesis block (64 zeros)
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Payload data of the genesis block
pub const GENESIS_DATA: &str = "Genesis";

/// Timestamp format of block headers (UTC, second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A block of the simulated chain
///
/// `hash` is empty until the block has been mined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    /// Raw payload, or the Merkle root of `transactions`
    pub data: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
    pub timestamp: String,
    pub hash: String,
}

impl Block {
    /// Unmined block carrying a raw payload
    pub fn new(
        index: u64,
        previous_hash: impl Into<String>,
        data: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            index,
            previous_hash: previous_hash.into(),
            data: data.into(),
            transactions: Vec::new(),
            nonce: 0,
            timestamp: timestamp.into(),
            hash: String::new(),
        }
    }

    /// Unmined block whose payload is the Merkle root of `transactions`
    pub fn with_transactions(
        index: u64,
        previous_hash: impl Into<String>,
        transactions: Vec<Transaction>,
        timestamp: impl Into<String>,
    ) -> Self {
        let mut block = Self::new(
            index,
            previous_hash,
            transactions_root(&transactions),
            timestamp,
        );
        block.transactions = transactions;
        block
    }

    /// Unmined genesis block
    pub fn genesis(timestamp: impl Into<String>) -> Self {
        Self::new(0, GENESIS_PREVIOUS_HASH, GENESIS_DATA, timestamp)
    }

    /// The exact string that is hashed for this block
    pub fn payload_string(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.index, self.previous_hash, self.data, self.nonce, self.timestamp
        )
    }

    pub fn is_mined(&self) -> bool {
        !self.hash.is_empty()
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`
pub fn now_iso8601() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
