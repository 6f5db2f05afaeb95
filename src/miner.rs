//! Proof-of-work nonce search
//!
//! Mining starts from nonce 0 and increments until the block hash has the
//! required number of leading zero hex digits. The search is unbounded by
//! default; a [`StopPolicy`] can cap the iteration count or cancel the search
//! from another thread. A block is only ever returned fully mined.
//!
//! Parallel mining splits the nonce space into interleaved subspaces
//! (`worker, worker + n, worker + 2n, ...`). The lowest valid nonce wins, so
//! the result is identical to a sequential search.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use cahash_core::{leading_zero_nibbles, valid_hash, BlockHasher};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, trace};

use crate::block::Block;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MineError {
    #[error("no valid nonce within {limit} iterations")]
    IterationLimit { limit: u64 },

    #[error("mining cancelled")]
    Cancelled,

    #[error("hashing failed: {0}")]
    Hash(#[from] cahash_core::Error),
}

/// When to give up on a nonce search
///
/// The default never gives up.
#[derive(Debug, Clone, Default)]
pub struct StopPolicy {
    /// Maximum number of nonce increments
    pub max_iterations: Option<u64>,
    /// Set to `true` from any thread to abort the search
    pub cancel: Option<Arc<AtomicBool>>,
}

impl StopPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, limit: u64) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn exceeded(&self, nonce: u64) -> bool {
        self.max_iterations.is_some_and(|limit| nonce > limit)
    }
}

/// A successfully mined block
#[derive(Debug, Clone, PartialEq)]
pub struct Mined {
    pub block: Block,
    /// Nonce increments needed by a sequential search (equals the winning nonce)
    pub iterations: u64,
    /// Digests actually computed, across all workers
    pub hashes: u64,
}

/// Nonce searcher bound to a hasher
#[derive(Debug, Clone)]
pub struct Miner<H> {
    hasher: H,
    policy: StopPolicy,
    threads: usize,
}

impl<H: BlockHasher + Clone> Miner<H> {
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            policy: StopPolicy::default(),
            threads: 1,
        }
    }

    pub fn with_policy(mut self, policy: StopPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of parallel workers (values below 1 are treated as 1)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn policy(&self) -> &StopPolicy {
        &self.policy
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Search for the lowest nonce whose block hash meets `difficulty`
    ///
    /// The block's nonce is reset to 0 before the search starts.
    pub fn mine(&self, block: Block, difficulty: usize) -> Result<Mined, MineError> {
        let mined = if self.threads > 1 {
            self.mine_parallel(block, difficulty)?
        } else {
            self.mine_sequential(block, difficulty)?
        };

        debug!(
            index = mined.block.index,
            nonce = mined.block.nonce,
            iterations = mined.iterations,
            zeros = leading_zero_nibbles(&mined.block.hash),
            hasher = self.hasher.name(),
            "block mined"
        );
        Ok(mined)
    }

    fn mine_sequential(&self, mut block: Block, difficulty: usize) -> Result<Mined, MineError> {
        block.nonce = 0;
        let mut iterations = 0u64;

        loop {
            let hash = self.hasher.hash(block.payload_string().as_bytes())?;
            if valid_hash(&hash, difficulty) {
                block.hash = hash;
                return Ok(Mined {
                    block,
                    iterations,
                    hashes: iterations + 1,
                });
            }

            if let Some(limit) = self.policy.max_iterations {
                if iterations >= limit {
                    return Err(MineError::IterationLimit { limit });
                }
            }
            if self.policy.is_cancelled() {
                return Err(MineError::Cancelled);
            }

            block.nonce += 1;
            iterations += 1;
        }
    }

    fn mine_parallel(&self, mut block: Block, difficulty: usize) -> Result<Mined, MineError> {
        let threads = self.threads as u64;
        let best = AtomicU64::new(u64::MAX);
        let hashes = AtomicU64::new(0);
        let abort = AtomicBool::new(false);
        let failure = Mutex::new(None::<cahash_core::Error>);

        (0..threads).into_par_iter().for_each(|worker| {
            let hasher = self.hasher.clone();
            let mut candidate = block.clone();
            let mut nonce = worker;

            loop {
                if nonce > best.load(Ordering::Acquire)
                    || self.policy.exceeded(nonce)
                    || abort.load(Ordering::Relaxed)
                    || self.policy.is_cancelled()
                {
                    return;
                }

                candidate.nonce = nonce;
                let hash = match hasher.hash(candidate.payload_string().as_bytes()) {
                    Ok(hash) => hash,
                    Err(e) => {
                        *failure.lock().unwrap_or_else(|p| p.into_inner()) = Some(e);
                        abort.store(true, Ordering::SeqCst);
                        return;
                    }
                };
                hashes.fetch_add(1, Ordering::Relaxed);

                if valid_hash(&hash, difficulty) {
                    trace!(worker, nonce, "worker found valid nonce");
                    best.fetch_min(nonce, Ordering::AcqRel);
                    return;
                }

                nonce = match nonce.checked_add(threads) {
                    Some(next) => next,
                    None => return,
                };
            }
        });

        if let Some(e) = failure.into_inner().unwrap_or_else(|p| p.into_inner()) {
            return Err(e.into());
        }

        let winner = best.into_inner();
        if winner == u64::MAX {
            if self.policy.is_cancelled() {
                return Err(MineError::Cancelled);
            }
            return Err(MineError::IterationLimit {
                limit: self.policy.max_iterations.unwrap_or(u64::MAX),
            });
        }

        block.nonce = winner;
        block.hash = self.hasher.hash(block.payload_string().as_bytes())?;
        Ok(Mined {
            block,
            iterations: winner,
            hashes: hashes.into_inner(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cahash_core::{HashProvider, Rule};

    fn template() -> Block {
        Block::new(1, "0".repeat(64), "Block 1", "2024-01-01T00:00:00Z")
    }

    #[test]
    fn test_difficulty_zero_accepts_first_nonce() {
        let miner = Miner::new(HashProvider::reference());
        let mined = miner.mine(template(), 0).unwrap();

        assert_eq!(mined.iterations, 0);
        assert_eq!(mined.block.nonce, 0);
        assert!(mined.block.is_mined());
    }

    #[test]
    fn test_mined_hash_meets_difficulty() {
        let provider = HashProvider::reference();
        let miner = Miner::new(provider.clone());
        let mined = miner.mine(template(), 2).unwrap();

        assert!(valid_hash(&mined.block.hash, 2));
        assert!(leading_zero_nibbles(&mined.block.hash) >= 2);
        assert_eq!(mined.iterations, mined.block.nonce);
        assert_eq!(
            provider
                .hash(mined.block.payload_string().as_bytes())
                .unwrap(),
            mined.block.hash
        );
    }

    #[test]
    fn test_mining_is_deterministic() {
        let miner = Miner::new(HashProvider::cellular(Rule::new(30), 32).unwrap());
        let a = miner.mine(template(), 1).unwrap();
        let b = miner.mine(template(), 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let provider = HashProvider::reference();
        let sequential = Miner::new(provider.clone()).mine(template(), 2).unwrap();
        let parallel = Miner::new(provider)
            .with_threads(4)
            .mine(template(), 2)
            .unwrap();

        assert_eq!(parallel.block, sequential.block);
        assert_eq!(parallel.iterations, sequential.iterations);
        assert!(parallel.hashes >= sequential.hashes);
    }

    #[test]
    fn test_iteration_limit() {
        // 64 leading zeros never happens
        let miner = Miner::new(HashProvider::reference())
            .with_policy(StopPolicy::unbounded().with_max_iterations(50));
        assert_eq!(
            miner.mine(template(), 64),
            Err(MineError::IterationLimit { limit: 50 })
        );

        let parallel = miner.clone().with_threads(3);
        assert_eq!(
            parallel.mine(template(), 64),
            Err(MineError::IterationLimit { limit: 50 })
        );
    }

    #[test]
    fn test_cancelled_before_start() {
        let flag = Arc::new(AtomicBool::new(true));
        let miner = Miner::new(HashProvider::reference())
            .with_policy(StopPolicy::unbounded().with_cancel(flag));

        assert_eq!(miner.mine(template(), 64), Err(MineError::Cancelled));
        assert_eq!(
            miner.clone().with_threads(2).mine(template(), 64),
            Err(MineError::Cancelled)
        );
    }

    #[test]
    fn test_nonce_reset_before_search() {
        let mut block = template();
        block.nonce = 999;
        let mined = Miner::new(HashProvider::reference())
            .mine(block, 0)
            .unwrap();
        assert_eq!(mined.block.nonce, 0);
    }
}
