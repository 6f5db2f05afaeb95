//! CA-Hash: a digest built from the evolution of an elementary cellular automaton
//!
//! 1. Encode the input as bits and repeat them around a ring of
//!    `max(256, bit_len)` cells.
//! 2. For every generation `t`: fold the ring into 256 bits by XOR
//!    (`folded[i % 256] ^= cell[i]`), XOR the folded vector rotated by
//!    `13 * t mod 256` into the accumulator, then evolve the ring once.
//! 3. The accumulator is the digest.
//!
//! The fold and the rotating offset are deliberately weak mixing steps; the
//! statistical harness in [`crate::stats`] measures them. Changing either
//! breaks every recorded digest.

use crate::automaton::{CellularAutomaton, Rule};
use crate::bits::{bits_to_bytes, bits_to_hex, text_to_bits};
use crate::error::Result;
use crate::params::*;

/// Reusable CA-Hash hasher
///
/// Keeps the automaton and the fold buffers between calls so mining loops and
/// the statistical harness do not reallocate per digest.
#[derive(Debug, Clone)]
pub struct AcHasher {
    rule: Rule,
    steps: usize,
    automaton: CellularAutomaton,
    folded: [bool; DIGEST_BITS],
    accumulator: [bool; DIGEST_BITS],
}

impl AcHasher {
    /// Create a hasher for `rule` running `steps` generations
    ///
    /// A step count of zero yields the all-zero digest for every input.
    pub fn new(rule: Rule, steps: usize) -> Self {
        Self {
            rule,
            steps,
            automaton: CellularAutomaton::new(Vec::new()),
            folded: [false; DIGEST_BITS],
            accumulator: [false; DIGEST_BITS],
        }
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Compute the digest of `input` as 64 lowercase hex characters
    pub fn hash(&mut self, input: &[u8]) -> Result<String> {
        self.run(input)?;
        bits_to_hex(&self.accumulator)
    }

    /// Compute the digest of `input` as raw bytes
    pub fn digest(&mut self, input: &[u8]) -> Result<[u8; DIGEST_BYTES]> {
        self.run(input)?;
        let bytes = bits_to_bytes(&self.accumulator)?;
        let mut out = [0u8; DIGEST_BYTES];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    fn run(&mut self, input: &[u8]) -> Result<()> {
        // Phase 1: seed the ring
        let bits = text_to_bits(input);
        let width = MIN_WIDTH.max(bits.len());
        self.automaton.reseed(&bits, width)?;
        self.accumulator = [false; DIGEST_BITS];

        // Phase 2: fold, accumulate, evolve
        for step in 0..self.steps {
            self.fold();
            let offset = (step * STEP_OFFSET) % DIGEST_BITS;
            for (j, acc) in self.accumulator.iter_mut().enumerate() {
                *acc ^= self.folded[(j + offset) % DIGEST_BITS];
            }
            self.automaton.evolve(self.rule);
        }

        Ok(())
    }

    /// XOR the current ring down to 256 bits
    #[inline(always)]
    fn fold(&mut self) {
        self.folded = [false; DIGEST_BITS];
        for (i, &cell) in self.automaton.cells().iter().enumerate() {
            self.folded[i % DIGEST_BITS] ^= cell;
        }
    }
}

impl Default for AcHasher {
    fn default() -> Self {
        Self::new(Rule::default(), DEFAULT_STEPS)
    }
}

/// Convenience function for single-shot hashing
///
/// For repeated hashing, prefer an [`AcHasher`] instance.
///
/// ```rust
/// use cahash_core::{ac_hash, Rule};
///
/// let digest = ac_hash(b"hello", Rule::new(30), 128).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn ac_hash(input: &[u8], rule: Rule, steps: usize) -> Result<String> {
    AcHasher::new(rule, steps).hash(input)
}
