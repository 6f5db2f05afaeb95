//! End-to-end checks of the public chain API

use cahash::algorithm::{HashProvider, Rule};
use cahash::{
    valid_hash, Block, BlockHasher, Blockchain, ChainError, HashMode, SimConfig, Transaction,
    ViolationKind,
};

fn fixed_clock() -> String {
    "2024-01-01T00:00:00Z".to_string()
}

fn build(provider: HashProvider, difficulty: usize, blocks: usize) -> Blockchain<HashProvider> {
    let mut chain = Blockchain::new(provider, difficulty).with_clock(fixed_clock);
    chain.add_genesis().unwrap();
    for i in 1..=blocks {
        chain.add_block(format!("Block {}", i)).unwrap();
    }
    chain
}

#[test]
fn chains_validate_across_difficulties() {
    for difficulty in 0..=2 {
        let chain = build(HashProvider::reference(), difficulty, 3);
        assert_eq!(chain.len(), 4);
        assert!(chain.validate_chain(), "difficulty {}", difficulty);

        for block in chain.blocks() {
            assert!(valid_hash(&block.hash, difficulty));
            assert_eq!(
                chain.hasher().hash(block.payload_string().as_bytes()).unwrap(),
                block.hash
            );
        }
    }
}

#[test]
fn cellular_chain_links_blocks() {
    let provider = HashProvider::cellular(Rule::new(30), 32).unwrap();
    let chain = build(provider, 1, 2);

    let blocks = chain.blocks();
    assert_eq!(blocks[0].previous_hash, "0".repeat(64));
    assert_eq!(blocks[1].previous_hash, blocks[0].hash);
    assert_eq!(blocks[2].previous_hash, blocks[1].hash);
    assert!(chain.validate_chain());
}

#[test]
fn json_round_trip_keeps_validity() {
    let chain = build(HashProvider::reference(), 2, 2);
    let json = chain.to_json().unwrap();

    let restored = Blockchain::from_json(HashProvider::reference(), 2, &json).unwrap();
    assert_eq!(restored.blocks(), chain.blocks());
    assert!(restored.validate_chain());
}

#[test]
fn tampered_export_is_detected() {
    let chain = build(HashProvider::reference(), 1, 3);

    let mut blocks = chain.blocks().to_vec();
    blocks[2].data = "Block 2 (edited)".to_string();
    let tampered = Blockchain::from_blocks(HashProvider::reference(), 1, blocks);
    let err = tampered.validate().unwrap_err();
    assert_eq!(err.index, 2);
    assert_eq!(err.kind, ViolationKind::HashMismatch);

    let json = chain.to_json().unwrap().replace("Block 1", "Block X");
    let tampered = Blockchain::from_json(HashProvider::reference(), 1, &json).unwrap();
    assert!(!tampered.validate_chain());
}

#[test]
fn rehashed_block_breaks_link() {
    let chain = build(HashProvider::reference(), 0, 2);
    let mut blocks = chain.blocks().to_vec();

    // Recompute block 1 so its own hash is consistent again
    blocks[1].data = "rewritten".to_string();
    blocks[1].hash = HashProvider::reference()
        .hash(blocks[1].payload_string().as_bytes())
        .unwrap();

    let tampered = Blockchain::from_blocks(HashProvider::reference(), 0, blocks);
    let err = tampered.validate().unwrap_err();
    assert_eq!(err.index, 2);
    assert_eq!(err.kind, ViolationKind::Linkage);
}

#[test]
fn foreign_block_is_rejected() {
    let mut chain = build(HashProvider::reference(), 1, 1);
    let stranger = Block::new(2, "f".repeat(64), "orphan", fixed_clock());

    let mined = chain.miner().mine(stranger, 1).unwrap();
    let err = chain.append(mined.block).unwrap_err();
    assert!(matches!(
        err,
        ChainError::Rejected(ref e) if e.kind == ViolationKind::Linkage
    ));
    assert_eq!(chain.len(), 2);
}

#[test]
fn transaction_block_commits_to_merkle_root() {
    let mut chain = build(HashProvider::reference(), 1, 0);
    let transactions = vec![
        Transaction::new("Alice", "Bob", 10.0),
        Transaction::new("Bob", "Charlie", 5.0),
    ];
    chain.add_transactions(transactions.clone()).unwrap();

    let block = chain.latest().unwrap();
    assert_eq!(block.transactions, transactions);
    assert_eq!(
        block.data,
        "5cb39246a62b81f775c3fecb93462ab6a10aad0a87bd3b20b98e7b0835ec53a7"
    );
    assert!(chain.validate_chain());
}

#[test]
fn forged_transaction_amount_is_detected() {
    let mut chain = build(HashProvider::reference(), 1, 0);
    chain
        .add_transactions(vec![Transaction::new("Alice", "Bob", 10.0)])
        .unwrap();

    let mut blocks = chain.blocks().to_vec();
    blocks[1].transactions[0].amount = 1_000_000.0;
    let forged = Blockchain::from_blocks(HashProvider::reference(), 1, blocks);

    let err = forged.validate().unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(err.kind, ViolationKind::MerkleRoot);
}

#[test]
fn config_driven_chain() {
    let config = SimConfig {
        hash: HashMode::cellular(90, 16),
        difficulty: 1,
        threads: 2,
        max_iterations: Some(100_000),
        ..SimConfig::default()
    };

    let mut chain = config.chain().unwrap().with_clock(fixed_clock);
    chain.add_genesis().unwrap();
    chain.add_block("Block 1").unwrap();

    assert_eq!(chain.hasher().mode(), HashMode::cellular(90, 16));
    assert!(chain.validate_chain());
}

#[test]
fn genesis_at_difficulty_four_terminates() {
    let provider = HashProvider::cellular(Rule::new(30), 128).unwrap();
    let mut chain = Blockchain::new(provider, 4).with_clock(fixed_clock);

    let genesis = chain.add_genesis().unwrap();
    assert!(genesis.hash.starts_with("0000"));
    assert!(chain.validate_chain());
}
