//! Append-only simulated blockchain
//!
//! Every block, genesis included, is mined under the chain's difficulty with
//! the chain's hasher. Blocks are checked before they are appended and can be
//! re-checked at any time with [`Blockchain::validate`]; a failed validation
//! is reported, never repaired.

use cahash_core::{valid_hash, BlockHasher};
use thiserror::Error;
use tracing::{info, warn};

use crate::block::{now_iso8601, Block, GENESIS_PREVIOUS_HASH};
use crate::merkle::{transactions_root, Transaction};
use crate::miner::{MineError, Mined, Miner};

/// Which check a block failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    #[error("previous hash does not match the preceding block")]
    Linkage,

    #[error("stored hash does not match the recomputed hash")]
    HashMismatch,

    #[error("hash does not meet the difficulty")]
    Difficulty,

    #[error("block index is out of sequence")]
    Index,

    #[error("transactions do not match the committed Merkle root")]
    MerkleRoot,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("block {index}: {kind}")]
pub struct ValidationError {
    pub index: usize,
    pub kind: ViolationKind,
}

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("chain has no genesis block")]
    MissingGenesis,

    #[error("chain already has a genesis block")]
    GenesisExists,

    #[error("block rejected: {0}")]
    Rejected(#[from] ValidationError),

    #[error(transparent)]
    Mine(#[from] MineError),

    #[error(transparent)]
    Hash(#[from] cahash_core::Error),

    #[error("chain serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Simulated blockchain over a pluggable hasher
#[derive(Debug, Clone)]
pub struct Blockchain<H> {
    blocks: Vec<Block>,
    miner: Miner<H>,
    difficulty: usize,
    clock: fn() -> String,
}

impl<H: BlockHasher + Clone> Blockchain<H> {
    /// Empty chain mining sequentially with no iteration cap
    pub fn new(hasher: H, difficulty: usize) -> Self {
        Self::with_miner(Miner::new(hasher), difficulty)
    }

    pub fn with_miner(miner: Miner<H>, difficulty: usize) -> Self {
        Self {
            blocks: Vec::new(),
            miner,
            difficulty,
            clock: now_iso8601,
        }
    }

    /// Replace the timestamp source used for new blocks
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Restore a chain from previously exported blocks
    ///
    /// The blocks are taken as-is; call [`Blockchain::validate`] to check them.
    pub fn from_blocks(hasher: H, difficulty: usize, blocks: Vec<Block>) -> Self {
        let mut chain = Self::new(hasher, difficulty);
        chain.blocks = blocks;
        chain
    }

    /// Restore a chain from the JSON produced by [`Blockchain::to_json`]
    pub fn from_json(hasher: H, difficulty: usize, json: &str) -> Result<Self, ChainError> {
        let blocks: Vec<Block> = serde_json::from_str(json)?;
        Ok(Self::from_blocks(hasher, difficulty, blocks))
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn hasher(&self) -> &H {
        self.miner.hasher()
    }

    pub fn miner(&self) -> &Miner<H> {
        &self.miner
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn latest(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Mine and append the genesis block
    pub fn add_genesis(&mut self) -> Result<&Block, ChainError> {
        if !self.blocks.is_empty() {
            return Err(ChainError::GenesisExists);
        }
        let mined = self.miner.mine(Block::genesis((self.clock)()), self.difficulty)?;
        self.append(mined.block)
    }

    /// Mine the next block over a raw payload without appending it
    pub fn mine_next(&self, data: impl Into<String>) -> Result<(Block, u64), ChainError> {
        let latest = self.latest().ok_or(ChainError::MissingGenesis)?;
        let template = Block::new(
            self.blocks.len() as u64,
            latest.hash.clone(),
            data,
            (self.clock)(),
        );
        let Mined {
            block, iterations, ..
        } = self.miner.mine(template, self.difficulty)?;
        Ok((block, iterations))
    }

    /// Mine the next block over a Merkle-rooted transaction list without appending it
    pub fn mine_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<(Block, u64), ChainError> {
        let latest = self.latest().ok_or(ChainError::MissingGenesis)?;
        let template = Block::with_transactions(
            self.blocks.len() as u64,
            latest.hash.clone(),
            transactions,
            (self.clock)(),
        );
        let Mined {
            block, iterations, ..
        } = self.miner.mine(template, self.difficulty)?;
        Ok((block, iterations))
    }

    /// Append a mined block after checking index, linkage, hash and difficulty
    pub fn append(&mut self, block: Block) -> Result<&Block, ChainError> {
        let index = self.blocks.len();
        if block.index != index as u64 {
            return Err(ValidationError {
                index,
                kind: ViolationKind::Index,
            }
            .into());
        }
        self.check_block(index, &block, self.blocks.last())?;

        info!(
            index,
            nonce = block.nonce,
            hash = %block.hash,
            "block appended"
        );
        self.blocks.push(block);
        Ok(&self.blocks[index])
    }

    /// Mine the next block over `data` and append it; returns the nonce increments
    pub fn add_block(&mut self, data: impl Into<String>) -> Result<u64, ChainError> {
        let (block, iterations) = self.mine_next(data)?;
        self.append(block)?;
        Ok(iterations)
    }

    /// Mine the next block over `transactions` and append it; returns the nonce increments
    pub fn add_transactions(&mut self, transactions: Vec<Transaction>) -> Result<u64, ChainError> {
        let (block, iterations) = self.mine_transactions(transactions)?;
        self.append(block)?;
        Ok(iterations)
    }

    /// Check every block and report the first violation
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (index, block) in self.blocks.iter().enumerate() {
            let previous = index.checked_sub(1).map(|i| &self.blocks[i]);
            self.check_block(index, block, previous)
                .map_err(|e| match e {
                    ChainError::Rejected(violation) => violation,
                    // Recomputation failure means the stored hash cannot be right
                    _ => ValidationError {
                        index,
                        kind: ViolationKind::HashMismatch,
                    },
                })
                .inspect_err(|e| warn!(index = e.index, kind = %e.kind, "chain invalid"))?;
        }
        Ok(())
    }

    /// `true` when every block passes [`Blockchain::validate`]
    pub fn validate_chain(&self) -> bool {
        self.validate().is_ok()
    }

    /// Export all blocks as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ChainError> {
        Ok(serde_json::to_string_pretty(&self.blocks)?)
    }

    fn check_block(
        &self,
        index: usize,
        block: &Block,
        previous: Option<&Block>,
    ) -> Result<(), ChainError> {
        let reject = |kind| ChainError::Rejected(ValidationError { index, kind });

        let expected_previous = previous.map_or(GENESIS_PREVIOUS_HASH, |p| p.hash.as_str());
        if block.previous_hash != expected_previous {
            return Err(reject(ViolationKind::Linkage));
        }
        if !block.transactions.is_empty() && transactions_root(&block.transactions) != block.data {
            return Err(reject(ViolationKind::MerkleRoot));
        }
        if self.hasher().hash(block.payload_string().as_bytes())? != block.hash {
            return Err(reject(ViolationKind::HashMismatch));
        }
        if !valid_hash(&block.hash, self.difficulty) {
            return Err(reject(ViolationKind::Difficulty));
        }
        Ok(())
    }
}
