//! Transactions and Merkle roots
//!
//! Leaves and inner nodes are SHA-256 hex digests. Each level pairs adjacent
//! entries, duplicating the last one when the count is odd, and hashes the
//! concatenation of each pair until a single root remains.

use std::str::FromStr;

use cahash_core::sha256_hex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value transfer recorded in a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }

    /// Leaf digest: SHA-256 of `sender || receiver || amount` (amount with six decimals)
    pub fn leaf_hash(&self) -> String {
        sha256_hex(format!("{}{}{:.6}", self.sender, self.receiver, self.amount).as_bytes())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransactionParseError {
    #[error("expected sender:receiver:amount, got {0:?}")]
    Format(String),

    #[error("invalid amount {0:?}")]
    Amount(String),
}

/// Parses `sender:receiver:amount`
impl FromStr for Transaction {
    type Err = TransactionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(sender), Some(receiver), Some(amount)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TransactionParseError::Format(s.to_string()));
        };
        if sender.is_empty() || receiver.is_empty() {
            return Err(TransactionParseError::Format(s.to_string()));
        }
        let amount = amount
            .trim()
            .parse::<f64>()
            .map_err(|_| TransactionParseError::Amount(amount.to_string()))?;
        Ok(Self::new(sender, receiver, amount))
    }
}

/// Fold a list of hex digests into their Merkle root
///
/// Returns an empty string for an empty list.
pub fn merkle_root(leaves: &[String]) -> String {
    if leaves.is_empty() {
        return String::new();
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                sha256_hex(format!("{}{}", left, right).as_bytes())
            })
            .collect();
    }

    level.swap_remove(0)
}

/// Merkle root over the leaf digests of `transactions`
pub fn transactions_root(transactions: &[Transaction]) -> String {
    let leaves: Vec<String> = transactions.iter().map(Transaction::leaf_hash).collect();
    merkle_root(&leaves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_hash() {
        let tx = Transaction::new("Alice", "Bob", 10.0);
        assert_eq!(
            tx.leaf_hash(),
            "5ae4fe1b717d4b6264ac26553596b6511629e53a8bdecde5a7b54a973f44b042"
        );
    }

    #[test]
    fn test_two_transaction_root() {
        let txs = vec![
            Transaction::new("Alice", "Bob", 10.0),
            Transaction::new("Bob", "Charlie", 5.0),
        ];
        assert_eq!(
            transactions_root(&txs),
            "5cb39246a62b81f775c3fecb93462ab6a10aad0a87bd3b20b98e7b0835ec53a7"
        );
    }

    #[test]
    fn test_single_leaf_is_root() {
        let leaf = sha256_hex(b"only");
        assert_eq!(merkle_root(&[leaf.clone()]), leaf);
    }

    #[test]
    fn test_odd_count_duplicates_last() {
        let a = sha256_hex(b"a");
        let b = sha256_hex(b"b");
        let c = sha256_hex(b"c");

        let ab = sha256_hex(format!("{}{}", a, b).as_bytes());
        let cc = sha256_hex(format!("{}{}", c, c).as_bytes());
        let expected = sha256_hex(format!("{}{}", ab, cc).as_bytes());

        assert_eq!(merkle_root(&[a, b, c]), expected);
    }

    #[test]
    fn test_empty_root() {
        assert_eq!(merkle_root(&[]), "");
        assert_eq!(transactions_root(&[]), "");
    }

    #[test]
    fn test_parse_transaction() {
        let tx: Transaction = "Alice:Bob:12.5".parse().unwrap();
        assert_eq!(tx, Transaction::new("Alice", "Bob", 12.5));

        assert!(matches!(
            "Alice:Bob".parse::<Transaction>(),
            Err(TransactionParseError::Format(_))
        ));
        assert!(matches!(
            "Alice:Bob:lots".parse::<Transaction>(),
            Err(TransactionParseError::Amount(_))
        ));
    }
}
