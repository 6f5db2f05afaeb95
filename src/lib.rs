//! CA-Hash Chain Simulator
//!
//! A teaching blockchain that can be secured either by SHA-256 or by the
//! experimental cellular-automaton hash from [`cahash_core`].
//!
//! # Overview
//!
//! Blocks are mined by proof-of-work (leading zero hex digits) under a
//! pluggable [`BlockHasher`]. The chain checks every block on append and can
//! be re-validated end to end, so tampering with any block's data, nonce or
//! link is detected.
//!
//! # Features
//!
//! - **Pluggable hashing**: SHA-256 or CA-Hash, chosen once per chain
//! - **Deterministic mining**: sequential or parallel search, same winning nonce
//! - **Bounded search**: optional iteration cap and cancellation flag
//! - **Merkle payloads**: blocks can commit to a transaction list
//! - **Stake draws**: seeded weighted validator selection
//!
//! # Example
//!
//! ```rust
//! use cahash::algorithm::{HashProvider, Rule};
//! use cahash::Blockchain;
//!
//! let provider = HashProvider::cellular(Rule::new(30), 32).unwrap();
//! let mut chain = Blockchain::new(provider, 1);
//!
//! chain.add_genesis().unwrap();
//! let iterations = chain.add_block("Block 1").unwrap();
//! println!("mined after {} nonce increments", iterations);
//!
//! assert!(chain.validate_chain());
//! ```

// Re-export the core algorithm
pub use cahash_core as algorithm;

pub mod block;
pub mod chain;
pub mod config;
pub mod merkle;
pub mod miner;
pub mod stake;

// Convenience re-exports
pub use algorithm::{ac_hash, valid_hash, BlockHasher, HashMode, HashProvider};
pub use block::Block;
pub use chain::{Blockchain, ChainError, ValidationError, ViolationKind};
pub use config::SimConfig;
pub use merkle::{merkle_root, Transaction};
pub use miner::{MineError, Mined, Miner, StopPolicy};
