//! CA-Hash Algorithm Parameters
//!
//! Defaults match the recorded test vectors (rule 30, 128 generations).

/// Digest width in bits
pub const DIGEST_BITS: usize = 256;

/// Digest width in bytes
pub const DIGEST_BYTES: usize = DIGEST_BITS / 8;

/// Length of a rendered digest (two hex digits per byte)
pub const DIGEST_HEX_LEN: usize = DIGEST_BYTES * 2;

/// Minimum automaton width; longer inputs widen the automaton to their bit length
pub const MIN_WIDTH: usize = DIGEST_BITS;

/// Per-generation rotation applied before accumulating a folded state
pub const STEP_OFFSET: usize = 13;

/// Default elementary rule
pub const DEFAULT_RULE: u8 = 30;

/// Default number of generations
pub const DEFAULT_STEPS: usize = 128;

/// Number of message pairs drawn by the avalanche test
pub const AVALANCHE_TRIALS: usize = 100;

/// Length of each avalanche test message in bytes
pub const AVALANCHE_MESSAGE_LEN: usize = 32;

/// Number of labelled messages hashed by the bit distribution test
pub const DISTRIBUTION_SAMPLES: usize = 500;

/// Seed used by the statistical harness unless the caller supplies one
pub const DEFAULT_SEED: u64 = 42;
