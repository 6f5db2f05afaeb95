//! # CA-Hash Core
//!
//! An experimental 256-bit hash built from a one-dimensional binary cellular
//! automaton, next to SHA-256 as a reference, behind one pluggable interface
//! for block hashing.
//!
//! CA-Hash is a teaching construction for studying diffusion, not a vetted
//! cryptographic primitive.
//!
//! ## Algorithm
//!
//! - Input bytes are expanded to bits (MSB first) and repeated around a ring
//!   of `max(256, bit_len)` cells
//! - Each generation the ring is XOR-folded to 256 bits and accumulated with a
//!   rotating offset of `13 * t mod 256`, then evolved once under an
//!   elementary rule (default: rule 30, 128 generations)
//! - The accumulator is rendered as 64 lowercase hex characters
//!
//! ## Example
//!
//! ```rust
//! use cahash_core::{AcHasher, BlockHasher, HashProvider, Rule, ac_hash, valid_hash};
//!
//! // Single-shot hashing
//! let digest = ac_hash(b"input data", Rule::new(30), 128).unwrap();
//!
//! // Check difficulty (leading zero hex digits)
//! if valid_hash(&digest, 2) {
//!     println!("Found digest with 2+ leading zeros!");
//! }
//!
//! // Reusable hasher (avoids re-allocation)
//! let mut hasher = AcHasher::new(Rule::new(30), 128);
//! let first = hasher.hash(b"first").unwrap();
//! let second = hasher.hash(b"second").unwrap();
//! assert_ne!(first, second);
//!
//! // Pluggable provider used by the chain
//! let provider = HashProvider::reference();
//! assert_eq!(provider.hash(b"abc").unwrap().len(), 64);
//! ```

mod achash;
mod automaton;
mod bits;
mod difficulty;
mod error;
mod params;
mod provider;
pub mod stats;

pub use achash::{AcHasher, ac_hash};
pub use automaton::{CellularAutomaton, Rule};
pub use bits::{bits_to_bytes, bits_to_hex, hamming_distance, hex_to_bits, text_to_bits};
pub use difficulty::{leading_zero_nibbles, valid_hash};
pub use error::{Error, Result};
pub use params::*;
pub use provider::{BlockHasher, HashMode, HashProvider, sha256_hex};
